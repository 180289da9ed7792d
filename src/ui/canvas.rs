use crate::core::{CanvasController, HitTarget, LayoutMetrics, Tool, create_demo_schema};
use crate::ui::connector::ConnectorLayer;
use crate::ui::prompt::PromptHost;
use crate::ui::table::{TableCard, card_key};
use crate::ui::table_editor::TableEditor;
use crate::ui::toolbar::Toolbar;
use crate::ui::{Icon, icons};
use leptos::prelude::*;
use leptos::{html, web_sys};

#[component]
pub fn SchemaCanvas(controller: RwSignal<CanvasController>) -> impl IntoView {
    // Пути связей. Первый расчёт по фиксированной геометрии карточек,
    // чтобы SSR и гидратация совпадали; дальше по реальным размерам из DOM
    let initial_routes = controller
        .try_update_untracked(|c| {
            let metrics = LayoutMetrics::new(c.store().tables());
            let routes = c.routes(&metrics).to_vec();
            c.invalidate_routes();
            routes
        })
        .unwrap_or_default();
    let routes = RwSignal::new(initial_routes);

    // Слой с трансформацией панорамирования
    let content_ref = NodeRef::<html::Div>::new();

    // Re-route after the browser has laid out the latest change
    #[cfg(not(feature = "ssr"))]
    {
        use crate::core::RoutedConnector;
        use crate::ui::measure::DomMeasurement;

        Effect::new(move |_| {
            controller.track();
            request_animation_frame(move || {
                let Some(content) = content_ref.get_untracked() else {
                    return;
                };
                let Some(measurement) = DomMeasurement::new(&content) else {
                    return;
                };
                let fresh: Option<Vec<RoutedConnector>> = controller
                    .try_update_untracked(|c| {
                        c.routes_stale().then(|| c.routes(&measurement).to_vec())
                    })
                    .flatten();
                if let Some(fresh) = fresh {
                    routes.set(fresh);
                }
            });
        });

        let resize = window_event_listener(leptos::ev::resize, move |_| {
            controller.update(|c| c.invalidate_routes());
        });
        on_cleanup(move || drop(resize));
    }

    // Pointer movement and release are tracked on the window so a fast drag
    // that leaves the card keeps working
    #[cfg(not(feature = "ssr"))]
    {
        use crate::core::Vector;

        let on_move = window_event_listener(leptos::ev::mousemove, move |ev| {
            let active = controller.with_untracked(|c| {
                c.interaction().is_panning() || c.interaction().drag().is_some()
            });
            if active {
                let delta = Vector::new(ev.movement_x() as f64, ev.movement_y() as f64);
                controller.update(|c| c.pointer_move(delta));
            }
        });
        let on_up = window_event_listener(leptos::ev::mouseup, move |_| {
            let active = controller.with_untracked(|c| {
                c.interaction().is_panning() || c.interaction().drag().is_some()
            });
            if active {
                controller.update(|c| c.pointer_up());
            }
        });
        on_cleanup(move || {
            drop(on_move);
            drop(on_up);
        });
    }

    // Горячие клавиши: undo/redo/escape
    #[cfg(not(feature = "ssr"))]
    {
        use crate::core::{KeyAction, KeyInput};

        let on_key = window_event_listener(leptos::ev::keydown, move |ev| {
            // Dialogs own the keyboard while open
            if controller.with_untracked(|c| c.prompt().is_some()) {
                return;
            }
            let input = KeyInput {
                key: ev.key(),
                ctrl: ev.ctrl_key(),
                meta: ev.meta_key(),
                shift: ev.shift_key(),
            };
            let handled = controller.try_update(|c| c.key_down(&input)).flatten();
            if matches!(handled, Some(KeyAction::Undo | KeyAction::Redo)) {
                ev.prevent_default();
            }
        });
        on_cleanup(move || drop(on_key));
    }

    let offset = move || controller.with(|c| c.interaction().canvas_offset());
    let tables = Memo::new(move |_| controller.with(|c| c.store().tables().to_vec()));
    let cursor = move || match controller.with(|c| (c.tool(), c.interaction().is_panning())) {
        (Tool::Hand, true) => "cursor-grabbing",
        (Tool::Hand, false) => "cursor-grab",
        (Tool::Relationship, _) => "cursor-crosshair",
        _ => "cursor-default",
    };

    view! {
        <div class="relative w-full h-screen bg-gray-50 overflow-hidden">
            <div
                class=move || format!("absolute inset-0 {}", cursor())
                on:mousedown=move |ev: web_sys::MouseEvent| {
                    if ev.button() != 0 {
                        return;
                    }
                    controller.update(|c| {
                        c.pointer_down(&HitTarget::Background);
                    });
                }
                on:mouseleave=move |_| controller.update(|c| c.pointer_leave())
                on:click=move |_| controller.update(|c| {
                    let _ = c.click(&HitTarget::Background);
                })
                on:contextmenu=move |ev: web_sys::MouseEvent| ev.prevent_default()
            >
                // Сетка на фоне
                <div class="absolute inset-0 bg-grid-pattern opacity-20"></div>

                <div
                    node_ref=content_ref
                    class="absolute top-0 left-0"
                    style:transform=move || {
                        let o = offset();
                        format!("translate({}px, {}px)", o.x, o.y)
                    }
                >
                    <For
                        each=move || tables.get()
                        key=card_key
                        children=move |table| view! { <TableCard table=table controller=controller/> }
                    />
                </div>

                <ConnectorLayer routes=routes controller=controller/>
            </div>

            <Toolbar controller=controller/>
            <TableEditor controller=controller/>
            <PromptHost controller=controller/>

            // Пустое состояние
            {move || {
                let empty = controller.with(|c| c.store().tables().is_empty());
                empty.then(|| view! {
                    <div class="absolute inset-0 flex items-center justify-center pointer-events-none">
                        <div class="text-center max-w-md px-8 pointer-events-auto">
                            <div class="w-24 h-24 mx-auto mb-6 bg-blue-100 rounded-full flex items-center justify-center text-blue-600">
                                <Icon name=icons::TABLE class="w-12 h-12"/>
                            </div>
                            <h2 class="text-3xl font-bold text-gray-800 mb-3">"Empty schema"</h2>
                            <p class="text-gray-600 mb-8">
                                "Pick the table tool to create your first table, or load the demo schema."
                            </p>
                            <div class="flex flex-col gap-3 w-full max-w-xs mx-auto">
                                <button
                                    class="w-full px-6 py-3 text-white bg-blue-600 hover:bg-blue-700 rounded-lg font-medium flex items-center justify-center gap-2"
                                    on:click=move |_| controller.update(|c| c.set_tool(Tool::Table))
                                >
                                    <Icon name=icons::PLUS/>
                                    "Create Your First Table"
                                </button>
                                <button
                                    class="w-full px-6 py-3 text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-lg font-medium flex items-center justify-center gap-2"
                                    on:click=move |_| controller.update(|c| c.load(create_demo_schema()))
                                >
                                    <Icon name=icons::TABLE/>
                                    "Load Demo Schema"
                                </button>
                            </div>
                        </div>
                    </div>
                })
            }}
        </div>
    }
}
