use crate::core::{CanvasController, HitTarget, RoutedConnector, Tool};
use leptos::prelude::*;

/// SVG layer drawing every routed foreign key
#[component]
pub fn ConnectorLayer(
    routes: RwSignal<Vec<RoutedConnector>>,
    controller: RwSignal<CanvasController>,
) -> impl IntoView {
    let offset = move || controller.with(|c| c.interaction().canvas_offset());

    view! {
        <svg class="absolute top-0 left-0 w-full h-full pointer-events-none overflow-visible">
            <defs>
                <marker
                    id="arrowhead"
                    markerWidth="10"
                    markerHeight="10"
                    refX="9"
                    refY="3"
                    orient="auto"
                >
                    <polygon points="0 0, 10 3, 0 6" fill="#4B5563" />
                </marker>
                <marker
                    id="arrowhead-active"
                    markerWidth="10"
                    markerHeight="10"
                    refX="9"
                    refY="3"
                    orient="auto"
                >
                    <polygon points="0 0, 10 3, 0 6" fill="#DC2626" />
                </marker>
            </defs>

            <g transform=move || {
                let o = offset();
                format!("translate({}, {})", o.x, o.y)
            }>
                <For
                    each=move || routes.get()
                    key=|route| (route.foreign_key_id.clone(), route.path.svg_path())
                    children=move |route| view! { <Connector route=route controller=controller/> }
                />
            </g>
        </svg>
    }
}

#[component]
fn Connector(route: RoutedConnector, controller: RwSignal<CanvasController>) -> impl IntoView {
    let (hovered, set_hovered) = signal(false);
    let label = Memo::new({
        let fk_id = route.foreign_key_id.clone();
        move |_| {
            controller.with(|c| {
                c.store()
                    .foreign_key(&fk_id)
                    .map(|fk| format!("{} / {}", fk.on_delete, fk.on_update))
                    .unwrap_or_default()
            })
        }
    });
    let deletable = move || matches!(controller.with(|c| c.tool()), Tool::Move | Tool::Edit);

    let d = route.path.svg_path();
    let label_point = route.path.label_point();
    let target = HitTarget::ForeignKey(route.foreign_key_id.clone());

    view! {
        <g
            class="pointer-events-auto cursor-pointer"
            on:mouseenter=move |_| set_hovered.set(true)
            on:mouseleave=move |_| set_hovered.set(false)
            on:click=move |ev| {
                ev.stop_propagation();
                controller.update(|c| {
                    let _ = c.click(&target);
                });
            }
        >
            // Wide invisible stroke so the thin line is easy to hit
            <path d=d.clone() stroke="transparent" stroke-width="12" fill="none" />
            <path
                d=d
                stroke=move || if hovered.get() && deletable() { "#DC2626" } else { "#4B5563" }
                stroke-width="2"
                fill="none"
                marker-end=move || {
                    if hovered.get() && deletable() { "url(#arrowhead-active)" } else { "url(#arrowhead)" }
                }
            />
            <text
                x=label_point.x
                y=label_point.y
                fill="#4B5563"
                font-size="11"
                text-anchor="middle"
                class="select-none"
            >
                {move || label.get()}
            </text>
        </g>
    }
}
