//! Column form of the Edit tool

use crate::core::{CanvasController, Column, ColumnDraft, ColumnRef, HitTarget, SqlDataType};
use crate::ui::common::ErrorMessage;
use leptos::prelude::*;

#[component]
pub fn ColumnEditor(
    controller: RwSignal<CanvasController>,
    /// Колонка, которую редактируем
    column_ref: ColumnRef,
    /// Текущее определение колонки
    column: Column,
) -> impl IntoView {
    let draft = RwSignal::new(ColumnDraft::from_column(&column));
    let (error, set_error) = signal::<Option<String>>(None);

    // Любое изменение формы сбрасывает ошибку
    let edit = move |change: &dyn Fn(&mut ColumnDraft)| {
        draft.update(|d| change(d));
        set_error.set(None);
    };

    // Back to the table: select it without a column
    let table_target = HitTarget::Table(column_ref.table_id.clone());

    let handle_save = move |_| {
        let current = draft.get_untracked();
        let result = controller.try_update(|c| c.save_column(&column_ref, &current));
        match result {
            Some(Ok(_)) => set_error.set(None),
            Some(Err(err)) => set_error.set(Some(err.to_string())),
            None => {}
        }
    };
    let handle_close = move |_| {
        controller.update(|c| {
            let _ = c.click(&table_target);
        })
    };

    view! {
        <div class="space-y-3 pt-3 border-t border-gray-200">
            <h4 class="text-sm font-semibold text-gray-700">"Column"</h4>

            // Имя колонки
            <div>
                <label class="block text-xs font-medium text-gray-600 mb-1">
                    "Column Name" <span class="text-red-500">"*"</span>
                </label>
                <input
                    type="text"
                    class="w-full px-3 py-1.5 border border-gray-300 rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-blue-500"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d: &mut ColumnDraft| d.name = value.clone());
                    }
                />
            </div>

            // Тип данных и длина
            <div class="flex gap-2">
                <div class="flex-1">
                    <label class="block text-xs font-medium text-gray-600 mb-1">"Data Type"</label>
                    <select
                        class="w-full px-2 py-1.5 border border-gray-300 rounded-lg text-sm"
                        on:change=move |ev| {
                            if let Ok(parsed) = event_target_value(&ev).parse::<SqlDataType>() {
                                edit(&|d: &mut ColumnDraft| d.set_data_type(parsed));
                            }
                        }
                    >
                        {SqlDataType::all()
                            .iter()
                            .map(|t| {
                                let t = *t;
                                view! {
                                    <option
                                        value=t.as_str()
                                        selected=move || draft.with(|d| d.data_type == t)
                                    >
                                        {t.as_str()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>
                <div class="w-24">
                    <label class="block text-xs font-medium text-gray-600 mb-1">"Length"</label>
                    <input
                        type="text"
                        inputmode="numeric"
                        class="w-full px-2 py-1.5 border border-gray-300 rounded-lg text-sm"
                        prop:value=move || draft.with(|d| d.length.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(&|d: &mut ColumnDraft| d.length = value.clone());
                        }
                    />
                </div>
            </div>

            // Флаги
            <div class="space-y-1.5 text-sm text-gray-700">
                <label class="flex items-center">
                    <input
                        type="checkbox"
                        class="mr-2 h-4 w-4"
                        prop:checked=move || draft.with(|d| d.primary_key)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(&|d: &mut ColumnDraft| d.set_primary_key(checked));
                        }
                    />
                    "Primary Key"
                </label>
                <label class="flex items-center">
                    <input
                        type="checkbox"
                        class="mr-2 h-4 w-4"
                        prop:checked=move || draft.with(|d| d.nullable)
                        prop:disabled=move || draft.with(|d| d.primary_key)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(&|d: &mut ColumnDraft| d.nullable = checked);
                        }
                    />
                    "Nullable"
                </label>
                <label class="flex items-center">
                    <input
                        type="checkbox"
                        class="mr-2 h-4 w-4"
                        prop:checked=move || draft.with(|d| d.auto_increment)
                        prop:disabled=move || !draft.with(|d| d.data_type.supports_auto_increment())
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(&|d: &mut ColumnDraft| d.auto_increment = checked);
                        }
                    />
                    "Auto Increment"
                </label>
            </div>

            <div>
                <label class="block text-xs font-medium text-gray-600 mb-1">"Default Value"</label>
                <input
                    type="text"
                    class="w-full px-3 py-1.5 border border-gray-300 rounded-lg text-sm"
                    placeholder="Leave empty for no default"
                    prop:value=move || draft.with(|d| d.default_value.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d: &mut ColumnDraft| d.default_value = value.clone());
                    }
                />
            </div>

            <div>
                <label class="block text-xs font-medium text-gray-600 mb-1">"Description"</label>
                <textarea
                    class="w-full px-3 py-1.5 border border-gray-300 rounded-lg text-sm"
                    rows="2"
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d: &mut ColumnDraft| d.description = value.clone());
                    }
                ></textarea>
            </div>

            <ErrorMessage error=error/>

            <div class="flex justify-end gap-2">
                <button
                    class="px-3 py-1.5 text-sm text-gray-700 hover:bg-gray-100 rounded-lg"
                    on:click=handle_close
                >
                    "Close"
                </button>
                <button
                    class="px-3 py-1.5 text-sm text-white bg-blue-600 hover:bg-blue-700 rounded-lg"
                    on:click=handle_save
                >
                    "Save Column"
                </button>
            </div>
        </div>
    }
}
