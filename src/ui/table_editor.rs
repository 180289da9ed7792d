//! Side panel of the Edit tool: structure of the selected table

use crate::core::{CanvasController, ColumnRef, DeleteTarget, EntityId, HitTarget, SqlDataType, Tool};
use crate::ui::column_editor::ColumnEditor;
use crate::ui::common::ErrorMessage;
use crate::ui::{Icon, icons};
use leptos::prelude::*;
use leptos::web_sys;

#[component]
pub fn TableEditor(controller: RwSignal<CanvasController>) -> impl IntoView {
    let selected = Memo::new(move |_| {
        controller.with(|c| {
            if c.tool() != Tool::Edit {
                return None;
            }
            let selection = c.interaction().selection();
            let table = c.store().table(selection.table_id.as_ref()?)?.clone();
            Some((table, selection.column_id.clone()))
        })
    });

    move || {
        selected.get().map(|(table, selected_column)| {
            let table_id = table.id.clone();
            let last = table.columns.len().saturating_sub(1);
            let columns = table
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    let column_ref = ColumnRef::new(table_id.clone(), column.id.clone());
                    let is_selected = selected_column.as_ref() == Some(&column.id);
                    let select_target = HitTarget::Column(column_ref.clone());
                    let move_id = table_id.clone();
                    let move_by = move |to: usize| {
                        let result = controller.try_update(|c| c.move_column(&move_id, index, to));
                        if let Some(Err(err)) = result {
                            tracing::warn!(%err, "column reorder rejected");
                        }
                    };
                    view! {
                        <div class={
                            if is_selected {
                                "flex items-center justify-between py-1.5 px-1 text-sm bg-blue-50 rounded"
                            } else {
                                "flex items-center justify-between py-1.5 px-1 text-sm"
                            }
                        }>
                            <button
                                class="font-medium text-gray-800 hover:text-blue-600 truncate text-left"
                                title="Edit column"
                                on:click=move |_| {
                                    controller.update(|c| {
                                        let _ = c.click(&select_target);
                                    })
                                }
                            >
                                {column.name.clone()}
                            </button>
                            <div class="flex items-center gap-1">
                                <span class="text-xs text-gray-500 mr-1">{column.display_type()}</span>
                                <button
                                    class="p-1 text-gray-500 hover:bg-gray-100 rounded disabled:opacity-30"
                                    title="Move up"
                                    disabled={index == 0}
                                    on:click={
                                        let move_by = move_by.clone();
                                        move |_| move_by(index.saturating_sub(1))
                                    }
                                >
                                    <Icon name=icons::CHEVRON_UP class="w-3.5 h-3.5"/>
                                </button>
                                <button
                                    class="p-1 text-gray-500 hover:bg-gray-100 rounded disabled:opacity-30"
                                    title="Move down"
                                    disabled={index == last}
                                    on:click=move |_| move_by((index + 1).min(last))
                                >
                                    <Icon name=icons::CHEVRON_DOWN class="w-3.5 h-3.5"/>
                                </button>
                                <button
                                    class="p-1 text-red-600 hover:bg-red-50 rounded"
                                    title="Delete column"
                                    on:click=move |_| {
                                        controller.update(|c| {
                                            c.request_delete(DeleteTarget::Column(column_ref.clone()))
                                        })
                                    }
                                >
                                    <Icon name=icons::TRASH class="w-3.5 h-3.5"/>
                                </button>
                            </div>
                        </div>
                    }
                })
                .collect_view();

            // Форма выбранной колонки
            let column_form = selected_column.and_then(|column_id| {
                let column = table.column(&column_id)?.clone();
                let column_ref = ColumnRef::new(table_id.clone(), column_id);
                Some(view! { <ColumnEditor controller=controller column_ref=column_ref column=column/> })
            });

            let rename_id = table_id.clone();
            let delete_id = table_id.clone();

            view! {
                <div class="absolute top-4 right-4 z-40 w-80 max-h-[calc(100vh-2rem)] overflow-y-auto bg-white rounded-xl shadow-lg border border-gray-200 p-4 space-y-4">
                    <div class="flex items-center justify-between">
                        <h3 class="text-lg font-semibold text-gray-900 truncate">{table.name.clone()}</h3>
                        <div class="flex items-center gap-1">
                            <button
                                class="p-1 text-gray-600 hover:bg-gray-100 rounded"
                                title="Rename table"
                                on:click=move |_| controller.update(|c| c.request_rename(&rename_id))
                            >
                                <Icon name=icons::EDIT class="w-4 h-4"/>
                            </button>
                            <button
                                class="p-1 text-gray-600 hover:bg-gray-100 rounded"
                                title="Close"
                                on:click=move |_| controller.update(|c| c.clear_selection())
                            >
                                <Icon name=icons::X class="w-4 h-4"/>
                            </button>
                        </div>
                    </div>

                    <div class="divide-y divide-gray-100">{columns}</div>

                    {column_form}

                    <AddColumnForm controller=controller table_id=table_id/>

                    <div class="pt-3 border-t border-gray-200">
                        <button
                            class="px-4 py-2 text-sm font-medium text-red-600 hover:bg-red-50 rounded-lg flex items-center"
                            on:click=move |_| {
                                controller.update(|c| c.request_delete(DeleteTarget::Table(delete_id.clone())))
                            }
                        >
                            <Icon name=icons::TRASH class="w-4 h-4 mr-1.5"/>
                            "Delete Table"
                        </button>
                    </div>
                </div>
            }
        })
    }
}

#[component]
fn AddColumnForm(controller: RwSignal<CanvasController>, table_id: EntityId) -> impl IntoView {
    let (name, set_name) = signal(String::new());
    let (data_type, set_data_type) = signal(SqlDataType::Int);
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move || {
        let result = controller.try_update(|c| c.add_column(&table_id, &name.get_untracked(), data_type.get_untracked()));
        match result {
            Some(Ok(_)) => {
                set_name.set(String::new());
                set_error.set(None);
            }
            Some(Err(err)) => set_error.set(Some(err.to_string())),
            None => {}
        }
    };
    let submit_on_enter = submit.clone();

    view! {
        <div class="space-y-2">
            <div class="flex gap-2">
                <input
                    type="text"
                    class="flex-1 min-w-0 px-3 py-1.5 border border-gray-300 rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="column name"
                    prop:value=move || name.get()
                    on:input=move |ev| {
                        set_name.set(event_target_value(&ev));
                        set_error.set(None);
                    }
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            submit_on_enter();
                        }
                    }
                />
                <select
                    class="px-2 py-1.5 border border-gray-300 rounded-lg text-sm"
                    on:change=move |ev| {
                        if let Ok(parsed) = event_target_value(&ev).parse::<SqlDataType>() {
                            set_data_type.set(parsed);
                        }
                    }
                >
                    {SqlDataType::all()
                        .iter()
                        .map(|t| {
                            let t = *t;
                            view! {
                                <option value=t.as_str() selected=move || data_type.get() == t>
                                    {t.as_str()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button
                    class="p-2 text-white bg-blue-600 hover:bg-blue-700 rounded-lg disabled:opacity-50"
                    title="Add column"
                    disabled=move || name.get().trim().is_empty()
                    on:click=move |_| submit()
                >
                    <Icon name=icons::PLUS class="w-4 h-4"/>
                </button>
            </div>
            <ErrorMessage error=error/>
        </div>
    }
}
