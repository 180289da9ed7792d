use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};

use crate::core::{CanvasController, EditorConfig, create_demo_schema};
use crate::ui::SchemaCanvas;

/// Id of the script element carrying the server's [`EditorConfig`]
pub const CONFIG_ELEMENT_ID: &str = "editor-config";

pub fn shell(options: LeptosOptions) -> impl IntoView {
    let config_json = use_context::<EditorConfig>()
        .unwrap_or_default()
        .to_json()
        .unwrap_or_else(|err| {
            tracing::warn!(%err, "failed to serialize editor config, client falls back to defaults");
            "{}".to_string()
        });

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
                <script type="application/json" id=CONFIG_ELEMENT_ID inner_html=config_json></script>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Server and client build the same starting document so hydration matches:
    // the server reads its context, the client the config embedded by `shell`
    let config = use_context::<EditorConfig>()
        .or_else(embedded_config)
        .unwrap_or_default();
    let mut controller = CanvasController::new(config);
    controller.load(create_demo_schema());
    controller.set_on_change(|snapshot| {
        tracing::debug!(
            tables = snapshot.tables.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            "schema changed"
        );
    });
    let controller = RwSignal::new(controller);

    view! {
        <Stylesheet id="leptos" href="/pkg/schema-canvas.css"/>
        <Title text="Schema Canvas"/>

        <div class="w-full h-screen">
            <SchemaCanvas controller=controller />
        </div>
    }
}

/// Config the server embedded in the page
#[cfg(not(feature = "ssr"))]
fn embedded_config() -> Option<EditorConfig> {
    let element = leptos::web_sys::window()?
        .document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)?;
    let json = element.text_content()?;
    match EditorConfig::from_json(&json) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(%err, "embedded editor config unreadable, using defaults");
            None
        }
    }
}

#[cfg(feature = "ssr")]
fn embedded_config() -> Option<EditorConfig> {
    None
}
