//! Answers the controller's pending prompt with a dialog

use crate::core::{CanvasController, PendingPrompt};
use crate::ui::common::{ConfirmDialog, NameDialog};
use leptos::prelude::*;

#[component]
pub fn PromptHost(controller: RwSignal<CanvasController>) -> impl IntoView {
    let prompt = Memo::new(move |_| controller.with(|c| c.prompt().cloned()));

    let submit_name = Callback::new(move |name: String| {
        let result = controller
            .try_update(|c| c.answer_name(Some(name)))
            .unwrap_or(Ok(false));
        result.err().map(|err| err.to_string())
    });
    let cancel_name = Callback::new(move |_| {
        controller.update(|c| {
            let _ = c.answer_name(None);
        });
    });
    let confirm = Callback::new(move |_| {
        controller.update(|c| {
            c.answer_confirm(true);
        });
    });
    let decline = Callback::new(move |_| {
        controller.update(|c| {
            c.answer_confirm(false);
        });
    });

    move || match prompt.get() {
        Some(PendingPrompt::NameTable { default_name }) => view! {
            <NameDialog
                title="New Table".to_string()
                initial=default_name
                on_submit=submit_name
                on_cancel=cancel_name
            />
        }
        .into_any(),
        Some(PendingPrompt::RenameTable { current, .. }) => view! {
            <NameDialog
                title="Rename Table".to_string()
                initial=current
                on_submit=submit_name
                on_cancel=cancel_name
            />
        }
        .into_any(),
        Some(PendingPrompt::ConfirmDelete { message, .. }) => view! {
            <ConfirmDialog
                title="Confirm Delete".to_string()
                message=message
                on_confirm=confirm
                on_cancel=decline
            />
        }
        .into_any(),
        None => ().into_any(),
    }
}
