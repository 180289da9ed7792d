use leptos::prelude::*;

/// Inline stroke icon
#[component]
pub fn Icon(
    /// Path data, one of [`icons`]
    name: &'static str,
    /// CSS classes for sizing and colour
    #[prop(default = "w-5 h-5")]
    class: &'static str,
) -> impl IntoView {
    view! {
        <svg
            class=class
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            viewBox="0 0 24 24"
            aria-hidden="true"
        >
            <path d=name></path>
        </svg>
    }
}

/// SVG path data of the icons used by the editor (24x24 grid)
pub mod icons {
    pub const HAND: &str = "M18 11V6a2 2 0 0 0-4 0v5M14 10V4a2 2 0 0 0-4 0v6M10 10.5V6a2 2 0 0 0-4 0v8a8 8 0 0 0 16 0v-3a2 2 0 0 0-4 0";
    pub const MOVE: &str = "M5 9l-3 3 3 3M9 5l3-3 3 3M15 19l-3 3-3-3M19 9l3 3-3 3M2 12h20M12 2v20";
    pub const TABLE: &str = "M3 3h18v18H3zM3 9h18M3 15h18M9 3v18";
    pub const EDIT: &str = "M12 20h9M16.5 3.5a2.1 2.1 0 0 1 3 3L7 19l-4 1 1-4z";
    pub const LINK: &str = "M10 13a5 5 0 0 0 7.5.5l3-3a5 5 0 0 0-7-7l-1.7 1.7M14 11a5 5 0 0 0-7.5-.5l-3 3a5 5 0 0 0 7 7l1.7-1.7";
    pub const UNDO: &str = "M3 7v6h6M3 13a9 9 0 1 0 3-7.7L3 8";
    pub const REDO: &str = "M21 7v6h-6M21 13a9 9 0 1 1-3-7.7L21 8";
    pub const PLUS: &str = "M12 5v14M5 12h14";
    pub const KEY: &str = "M21 2l-2 2m-7.6 7.6a5.5 5.5 0 1 1-7.8 7.8 5.5 5.5 0 0 1 7.8-7.8zm0 0L15.5 7.5m0 0l3 3L22 7l-3-3m-3.5 3.5L19 4";
    pub const TRASH: &str = "M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6";
    pub const CHEVRON_UP: &str = "M18 15l-6-6-6 6";
    pub const CHEVRON_DOWN: &str = "M6 9l6 6 6-6";
    pub const X: &str = "M18 6L6 18M6 6l12 12";
    pub const CHECK: &str = "M20 6L9 17l-5-5";
    pub const ALERT_CIRCLE: &str = "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20zM12 8v4M12 16h.01";
}

/// Icon of a tool in the toolbar
pub fn tool_icon(tool: crate::core::Tool) -> &'static str {
    use crate::core::Tool;
    match tool {
        Tool::Hand => icons::HAND,
        Tool::Move => icons::MOVE,
        Tool::Table => icons::TABLE,
        Tool::Edit => icons::EDIT,
        Tool::Relationship => icons::LINK,
    }
}
