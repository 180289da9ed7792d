use crate::core::{CanvasController, Tool};
use crate::ui::common::{ErrorMessage, KeyboardHints, canvas_shortcuts};
use crate::ui::icon::{Icon, icons, tool_icon};
use leptos::prelude::*;

#[component]
pub fn Toolbar(controller: RwSignal<CanvasController>) -> impl IntoView {
    let active = Memo::new(move |_| controller.with(|c| c.tool()));
    let past = Memo::new(move |_| controller.with(|c| c.document().history().past_len()));
    let future = Memo::new(move |_| controller.with(|c| c.document().history().future_len()));
    let limit = controller.with_untracked(|c| c.document().history().limit());

    let tool_buttons = Tool::all()
        .into_iter()
        .map(|tool| {
            view! {
                <button
                    class=move || {
                        if active.get() == tool {
                            "p-2 rounded-lg bg-blue-600 text-white"
                        } else {
                            "p-2 rounded-lg text-gray-700 hover:bg-gray-100"
                        }
                    }
                    title=format!("{}: {}", tool.label(), tool.description())
                    on:click=move |_| controller.update(|c| c.set_tool(tool))
                >
                    <Icon name=tool_icon(tool)/>
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="absolute top-4 left-1/2 -translate-x-1/2 z-40 flex flex-col items-center gap-2">
            <div class="flex items-center gap-1 bg-white rounded-xl shadow-lg border border-gray-200 p-1">
                {tool_buttons}

                <div class="w-px h-6 bg-gray-200 mx-1"></div>

                <button
                    class="p-2 rounded-lg text-gray-700 hover:bg-gray-100 disabled:opacity-40 flex items-center gap-1"
                    title=move || format!("Undo ({} of {} steps kept)", past.get(), limit)
                    disabled=move || past.get() == 0
                    on:click=move |_| controller.update(|c| {
                        c.undo();
                    })
                >
                    <Icon name=icons::UNDO/>
                    <span class="text-xs">{move || past.get()}</span>
                </button>
                <button
                    class="p-2 rounded-lg text-gray-700 hover:bg-gray-100 disabled:opacity-40 flex items-center gap-1"
                    title="Redo"
                    disabled=move || future.get() == 0
                    on:click=move |_| controller.update(|c| {
                        c.redo();
                    })
                >
                    <Icon name=icons::REDO/>
                    <span class="text-xs">{move || future.get()}</span>
                </button>
            </div>

            <StatusHint controller=controller/>
            <FailureNotice controller=controller/>
        </div>
    }
}

/// One-line hint about what the active tool expects next
#[component]
fn StatusHint(controller: RwSignal<CanvasController>) -> impl IntoView {
    let hint = move || {
        controller.with(|c| match (c.tool(), c.interaction().connection_start()) {
            (Tool::Relationship, Some(start)) => {
                let name = c
                    .store()
                    .column(start)
                    .map(|col| col.name.clone())
                    .unwrap_or_default();
                format!("Pick the referenced column for \"{}\" (Esc to cancel)", name)
            }
            (tool, _) => tool.description().to_string(),
        })
    };

    view! {
        <div class="bg-white/90 rounded-lg shadow px-3 py-1 text-xs text-gray-600 flex items-center gap-4">
            <span>{hint}</span>
            <KeyboardHints hints=canvas_shortcuts()/>
        </div>
    }
}

/// Last rejected canvas action, until dismissed
#[component]
fn FailureNotice(controller: RwSignal<CanvasController>) -> impl IntoView {
    let failure = Signal::derive(move || controller.with(|c| c.failure().map(str::to_string)));
    let dismiss = Callback::new(move |_: ()| controller.update(|c| c.dismiss_failure()));

    view! {
        <Show when=move || failure.get().is_some()>
            <div class="bg-white rounded-lg shadow px-3 py-1.5 border border-red-200">
                <ErrorMessage error=failure on_dismiss=dismiss/>
            </div>
        </Show>
    }
}
