use crate::core::{CanvasController, Column, ColumnRef, EntityId, HitTarget, Table, TypeCategory};
use crate::ui::{Icon, icons};
use leptos::prelude::*;
use leptos::web_sys;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Card geometry, shared with `LayoutMetrics` so server-rendered connectors line up
pub const TABLE_WIDTH: f64 = 280.0;
pub const HEADER_HEIGHT: f64 = 48.0;
pub const PADDING_TOP: f64 = 8.0;
pub const ROW_HEIGHT: f64 = 36.0;

#[component]
pub fn TableCard(table: Table, controller: RwSignal<CanvasController>) -> impl IntoView {
    let table_id = table.id.clone();

    let position = {
        let table_id = table_id.clone();
        let base = table.position;
        move || {
            let delta = controller.with(|c| c.drag_preview(&table_id));
            (base.x + delta.x, base.y + delta.y)
        }
    };
    let left = {
        let position = position.clone();
        move || format!("{}px", position().0)
    };
    let top = move || format!("{}px", position().1);

    let is_selected = {
        let table_id = table_id.clone();
        move || {
            controller.with(|c| c.interaction().selection().table_id.as_ref() == Some(&table_id))
        }
    };

    let on_mouse_down = {
        let table_id = table_id.clone();
        move |ev: web_sys::MouseEvent| {
            if ev.button() != 0 {
                return;
            }
            ev.stop_propagation();
            let target = HitTarget::Table(table_id.clone());
            controller.update(|c| {
                c.pointer_down(&target);
            });
        }
    };

    let on_click = {
        let table_id = table_id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            let target = HitTarget::Table(table_id.clone());
            controller.update(|c| {
                let _ = c.click(&target);
            });
        }
    };

    let on_rename = {
        let table_id = table_id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            controller.update(|c| c.request_rename(&table_id));
        }
    };

    let rows = table
        .columns
        .into_iter()
        .map(|column| {
            let column_ref = ColumnRef::new(table_id.clone(), column.id.clone());
            view! { <ColumnRow column=column column_ref=column_ref controller=controller/> }
        })
        .collect_view();

    view! {
        <div
            data-table-id=table_id.to_string()
            class=move || {
                if is_selected() {
                    "absolute bg-white border-2 border-blue-500 rounded-lg shadow-xl select-none"
                } else {
                    "absolute bg-white border-2 border-gray-300 rounded-lg shadow-lg select-none hover:shadow-xl"
                }
            }
            style:left=left
            style:top=top
            style:width=format!("{}px", TABLE_WIDTH)
            style:padding-bottom=format!("{}px", PADDING_TOP)
            on:mousedown=on_mouse_down
            on:click=on_click
            on:contextmenu=move |ev: web_sys::MouseEvent| ev.prevent_default()
        >
            // Заголовок таблицы
            <div
                class="bg-blue-600 text-white px-4 rounded-t-lg font-bold cursor-move flex items-center justify-between"
                style:height=format!("{}px", HEADER_HEIGHT)
                on:dblclick=on_rename
            >
                <span class="text-lg truncate">{table.name}</span>
                <Icon name=icons::TABLE class="w-4 h-4"/>
            </div>

            <div style:padding-top=format!("{}px", PADDING_TOP)>{rows}</div>
        </div>
    }
}

#[component]
fn ColumnRow(
    column: Column,
    column_ref: ColumnRef,
    controller: RwSignal<CanvasController>,
) -> impl IntoView {
    let is_connection_start = {
        let column_ref = column_ref.clone();
        move || controller.with(|c| c.interaction().connection_start() == Some(&column_ref))
    };
    let is_selected = {
        let column_ref = column_ref.clone();
        move || {
            controller.with(|c| {
                let selection = c.interaction().selection();
                selection.table_id.as_ref() == Some(&column_ref.table_id)
                    && selection.column_id.as_ref() == Some(&column_ref.column_id)
            })
        }
    };

    let on_click = {
        let column_ref = column_ref.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            let target = HitTarget::Column(column_ref.clone());
            // Rejections land in the controller's failure notice
            controller.update(|c| {
                let _ = c.click(&target);
            });
        }
    };

    let badge = badge_class(column.data_type.category());

    view! {
        <div
            data-column-id=column_ref.column_id.to_string()
            class=move || {
                let base = "flex items-center justify-between px-3 mx-2 rounded text-sm border-b border-gray-100 last:border-b-0";
                if is_connection_start() {
                    format!("{} bg-green-100 ring-2 ring-green-500", base)
                } else if is_selected() {
                    format!("{} bg-blue-50", base)
                } else {
                    format!("{} hover:bg-gray-50", base)
                }
            }
            style:height=format!("{}px", ROW_HEIGHT)
            on:click=on_click
        >
            <div class="flex items-center flex-1 min-w-0">
                {column.primary_key.then(|| view! {
                    <span class="text-yellow-500 mr-1" title="Primary Key">
                        <Icon name=icons::KEY class="w-3.5 h-3.5"/>
                    </span>
                })}
                <span class="font-medium text-gray-800 truncate">{column.name.clone()}</span>
                {(!column.nullable).then(|| view! {
                    <span class="text-red-500 text-xs ml-1" title="NOT NULL">"*"</span>
                })}
            </div>
            <span class=format!("text-xs ml-2 px-1.5 rounded {}", badge)>{column.display_type()}</span>
        </div>
    }
}

/// `<For>` key of a card: the id plus a digest of everything the card renders
pub fn card_key(table: &Table) -> (EntityId, u64) {
    let mut hasher = DefaultHasher::new();
    table.name.hash(&mut hasher);
    table.position.x.to_bits().hash(&mut hasher);
    table.position.y.to_bits().hash(&mut hasher);
    table.columns.hash(&mut hasher);
    table.description.hash(&mut hasher);
    (table.id.clone(), hasher.finish())
}

/// Colour of a data type badge
pub fn badge_class(category: TypeCategory) -> &'static str {
    match category {
        TypeCategory::Text => "bg-green-100 text-green-700",
        TypeCategory::Numeric => "bg-blue-100 text-blue-700",
        TypeCategory::Boolean => "bg-purple-100 text-purple-700",
        TypeCategory::Temporal => "bg-orange-100 text-orange-700",
        TypeCategory::Other => "bg-gray-100 text-gray-600",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LayoutMetrics, SqlDataType};

    fn users() -> Table {
        Table::new("users", "users")
            .with_position(10.0, 20.0)
            .with_column(Column::new("users_id", "id", SqlDataType::Int))
    }

    #[test]
    fn test_card_key_follows_rendered_state() {
        let table = users();
        let key = card_key(&table);
        assert_eq!(key, card_key(&table.clone()));
        assert_eq!(key.0, table.id);

        let mut moved = table.clone();
        moved.position.x += 1.0;
        assert_ne!(card_key(&moved), key);

        let mut renamed = table.clone();
        renamed.columns[0].name = "user_id".to_string();
        assert_ne!(card_key(&renamed), key);

        let mut retyped = table.clone();
        retyped.columns[0].nullable = false;
        assert_ne!(card_key(&retyped), key);
    }

    #[test]
    fn test_card_geometry_matches_layout_metrics() {
        let metrics = LayoutMetrics::new(&[]);
        assert_eq!(metrics.table_width, TABLE_WIDTH);
        assert_eq!(metrics.header_height, HEADER_HEIGHT);
        assert_eq!(metrics.padding_top, PADDING_TOP);
        assert_eq!(metrics.row_height, ROW_HEIGHT);
    }

    #[test]
    fn test_badge_classes_distinct_per_category() {
        let classes = [
            badge_class(TypeCategory::Text),
            badge_class(TypeCategory::Numeric),
            badge_class(TypeCategory::Boolean),
            badge_class(TypeCategory::Temporal),
            badge_class(TypeCategory::Other),
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
