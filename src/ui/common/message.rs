//! Inline error messages

use crate::ui::{Icon, icons};
use leptos::prelude::*;

/// Error line with an alert icon. Hidden while `error` is `None`.
#[component]
pub fn ErrorMessage(
    #[prop(into)] error: Signal<Option<String>>,
    /// Shows a close button when set
    #[prop(optional, into)]
    on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="flex items-center gap-1 text-xs text-red-600">
                <Icon name=icons::ALERT_CIRCLE class="w-3.5 h-3.5 shrink-0"/>
                <span class="flex-1">{move || error.get().unwrap_or_default()}</span>
                {on_dismiss.map(|dismiss| view! {
                    <button
                        class="p-0.5 hover:bg-red-50 rounded"
                        title="Dismiss"
                        on:click=move |_| dismiss.run(())
                    >
                        <Icon name=icons::X class="w-3 h-3"/>
                    </button>
                })}
            </div>
        </Show>
    }
}
