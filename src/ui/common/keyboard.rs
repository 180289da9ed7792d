//! Keyboard shortcut hints

use leptos::prelude::*;

/// Single keyboard shortcut hint
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardHint {
    /// The key combination (e.g. "Enter", "Ctrl+Z")
    pub key: String,
    /// What it does (e.g. "to undo")
    pub action: String,
}

impl KeyboardHint {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Shortcuts understood by the canvas
pub fn canvas_shortcuts() -> Vec<KeyboardHint> {
    vec![
        KeyboardHint::new("Ctrl+Z", "undo"),
        KeyboardHint::new("Ctrl+Shift+Z", "redo"),
        KeyboardHint::new("Ctrl+Y", "redo"),
        KeyboardHint::new("Esc", "cancel"),
    ]
}

/// Row of styled key hints
#[component]
pub fn KeyboardHints(hints: Vec<KeyboardHint>) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-4 text-xs text-gray-500">
            {hints
                .into_iter()
                .map(|hint| {
                    view! {
                        <div class="flex items-center">
                            <kbd class="px-2 py-1 bg-gray-100 rounded border border-gray-300 font-mono">
                                {hint.key}
                            </kbd>
                            <span class="ml-1">{hint.action}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_shortcuts_cover_history_and_cancel() {
        let keys: Vec<String> = canvas_shortcuts().into_iter().map(|h| h.key).collect();
        assert!(keys.contains(&"Ctrl+Z".to_string()));
        assert!(keys.contains(&"Ctrl+Y".to_string()));
        assert!(keys.contains(&"Esc".to_string()));
    }
}
