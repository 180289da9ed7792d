use crate::ui::common::keyboard::{KeyboardHint, KeyboardHints};
use crate::ui::icon::{Icon, icons};
use leptos::prelude::*;
use leptos::web_sys;

#[cfg(not(feature = "ssr"))]
use leptos::wasm_bindgen::JsCast;

/// Base modal: backdrop, header with close button, content
#[component]
pub fn BaseModal(
    /// Modal title
    title: String,
    /// Optional subtitle
    #[prop(optional)]
    subtitle: Option<String>,
    /// Callback to close the modal
    on_close: Callback<()>,
    children: Children,
    /// Maximum width class
    #[prop(default = "max-w-md")]
    max_width: &'static str,
) -> impl IntoView {
    #[cfg(not(feature = "ssr"))]
    {
        use leptos::ev::keydown;

        let handle_keydown = window_event_listener(keydown, move |ev| {
            if ev.key() == "Escape" {
                on_close.run(());
            }
        });

        on_cleanup(move || drop(handle_keydown));
    }

    view! {
        <div
            class="modal-backdrop fixed inset-0 z-50 flex items-center justify-center bg-black/30"
            on:click=move |e: web_sys::MouseEvent| {
                #[cfg(not(feature = "ssr"))]
                {
                    if let Some(element) = e.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                        && element.class_list().contains("modal-backdrop")
                    {
                        on_close.run(());
                    }
                }
                #[cfg(feature = "ssr")]
                {
                    let _ = e;
                }
            }
        >
            <div class=format!("w-full {} bg-white rounded-lg shadow-xl", max_width)>
                <div class="flex items-start justify-between px-6 pt-5">
                    <div>
                        <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
                        {subtitle.map(|s| view! { <p class="text-sm text-gray-500">{s}</p> })}
                    </div>
                    <button
                        class="p-1 text-gray-500 hover:text-gray-800 rounded"
                        on:click=move |_| on_close.run(())
                        title="Close"
                        aria-label="Close modal"
                    >
                        <Icon name=icons::X class="w-4 h-4"/>
                    </button>
                </div>
                <div class="p-6">{children()}</div>
            </div>
        </div>
    }
}

/// Yes/no question before a destructive action
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
    #[prop(default = "Delete".to_string())]
    confirm_text: String,
) -> impl IntoView {
    view! {
        <BaseModal title=title on_close=on_cancel>
            <div class="space-y-4">
                <p class="text-gray-700">{message}</p>
                <div class="flex items-center justify-end gap-2 pt-4 border-t border-gray-200">
                    <button
                        class="px-4 py-2 text-sm font-medium text-gray-700 hover:bg-gray-100 rounded-lg"
                        on:click=move |_| on_cancel.run(())
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-4 py-2 text-sm font-medium text-white bg-red-600 hover:bg-red-700 rounded-lg flex items-center"
                        on:click=move |_| on_confirm.run(())
                    >
                        <Icon name=icons::TRASH class="w-4 h-4 mr-1.5"/>
                        {confirm_text.clone()}
                    </button>
                </div>
            </div>
        </BaseModal>
    }
}

/// Single-field naming dialog. `on_submit` returns an error message to show, if any.
#[component]
pub fn NameDialog(
    title: String,
    initial: String,
    on_submit: Callback<String, Option<String>>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let (name, set_name) = signal(initial);
    let (error, set_error) = signal::<Option<String>>(None);
    let input_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move || {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
            input.select();
        }
    });

    let submit = move || {
        let value = name.get_untracked();
        set_error.set(on_submit.run(value));
    };

    let handle_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            submit();
        }
    };

    view! {
        <BaseModal title=title on_close=on_cancel>
            <div class="space-y-4">
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-2">
                        "Table Name"
                        <span class="text-red-500">"*"</span>
                    </label>
                    <input
                        node_ref=input_ref
                        type="text"
                        class="w-full px-4 py-2.5 border border-gray-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-blue-500"
                        prop:value=move || name.get()
                        on:input=move |ev| {
                            set_name.set(event_target_value(&ev));
                            set_error.set(None);
                        }
                        on:keydown=handle_keydown
                    />
                    {move || {
                        error
                            .get()
                            .map(|err| {
                                view! {
                                    <div class="mt-2 flex items-center text-sm text-red-600">
                                        <Icon name=icons::ALERT_CIRCLE class="w-4 h-4 mr-1.5"/>
                                        <span>{err}</span>
                                    </div>
                                }
                            })
                    }}
                </div>

                <div class="flex items-center justify-end gap-2 pt-4 border-t border-gray-200">
                    <button
                        class="px-4 py-2 text-sm font-medium text-gray-700 hover:bg-gray-100 rounded-lg"
                        on:click=move |_| on_cancel.run(())
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-6 py-2 text-sm font-medium text-white bg-blue-600 hover:bg-blue-700 rounded-lg disabled:opacity-50 flex items-center"
                        on:click=move |_| submit()
                        disabled=move || name.get().trim().is_empty()
                    >
                        <Icon name=icons::CHECK class="w-4 h-4 mr-1.5"/>
                        "Save"
                    </button>
                </div>

                <KeyboardHints hints=vec![
                    KeyboardHint::new("Enter", "to save"),
                    KeyboardHint::new("Esc", "to cancel"),
                ]/>
            </div>
        </BaseModal>
    }
}
