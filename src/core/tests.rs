#[cfg(test)]
mod tests {
    use crate::core::{
        BoundingBox, CanvasController, Column, ColumnRef, ConnectorRouter, EditorConfig, ElementRef,
        Endpoint, EntityId, ForeignKey, HitTarget, IdGenerator, InteractionState, LayoutMetrics,
        SchemaDocument, SchemaSnapshot, SchemaStore, SqlDataType, Table, Tool, Vector,
        create_demo_schema,
    };

    fn demo_controller() -> CanvasController {
        let mut controller = CanvasController::with_generator(
            EditorConfig::default(),
            IdGenerator::with_session("scn"),
        );
        controller.load(create_demo_schema());
        controller
    }

    // ========================================================================
    // Store cascade
    // ========================================================================

    #[test]
    fn test_delete_every_table_cascades() {
        let demo = create_demo_schema();
        for table in &demo.tables {
            let mut store = SchemaStore::from_snapshot(demo.clone());
            assert!(store.delete_table(&table.id).is_applied());

            assert!(store.table(&table.id).is_none());
            assert!(
                store
                    .foreign_keys()
                    .iter()
                    .all(|fk| fk.source_table_id != table.id && fk.target_table_id != table.id)
            );
        }
    }

    #[test]
    fn test_numeric_and_string_ids_compare_equal() {
        let mut store = SchemaStore::new();
        store
            .add_table(Table::new(42u64, "legacy").with_column(Column::default_primary_key(1u32)))
            .unwrap();

        assert!(store.table(&EntityId::from("42")).is_some());
        assert!(store.contains_column(&ColumnRef::new("42", "1")));
        assert!(store.delete_table(&"42".into()).is_applied());
    }

    #[test]
    fn test_snapshot_json_accepts_numeric_ids() {
        let json = r#"{
            "tables": [{
                "id": 7,
                "name": "t",
                "columns": [{
                    "id": 1, "name": "id", "dataType": "INT",
                    "nullable": false, "primaryKey": true, "autoIncrement": true
                }],
                "position": {"x": 0, "y": 0}
            }],
            "foreignKeys": []
        }"#;
        let snapshot: SchemaSnapshot = serde_json::from_str(json).unwrap();
        let store = SchemaStore::from_snapshot(snapshot);
        assert!(store.table(&"7".into()).is_some());
        assert!(store.contains_column(&ColumnRef::new(7u32, "1")));
    }

    // ========================================================================
    // History
    // ========================================================================

    #[test]
    fn test_round_trip_over_mixed_mutations() {
        let mut doc = SchemaDocument::default();
        doc.load(create_demo_schema());

        doc.add_table(Table::new("tags", "tags").with_column(Column::default_primary_key("tags_id")))
            .unwrap();
        let _ = doc
            .add_column(&"posts".into(), Column::new("posts_tag_id", "tag_id", SqlDataType::Int))
            .unwrap();
        doc.add_foreign_key(ForeignKey::new(
            "fk_posts_tags",
            ColumnRef::new("posts", "posts_tag_id"),
            ColumnRef::new("tags", "tags_id"),
        ))
        .unwrap();
        let _ = doc.delete_column(&ColumnRef::new("comments", "comments_post_id"));
        let _ = doc.delete_table(&"users".into());

        let final_state = doc.snapshot();
        let n = doc.history_depth();
        assert_eq!(n, 5);

        for _ in 0..n {
            doc.undo();
        }
        assert_eq!(doc.snapshot(), create_demo_schema());
        for _ in 0..n {
            doc.redo();
        }
        assert_eq!(doc.snapshot(), final_state);
    }

    #[test]
    fn test_interaction_changes_never_touch_history() {
        let mut c = demo_controller();
        for tool in Tool::all() {
            if tool != Tool::Table {
                c.set_tool(tool);
            }
        }
        c.set_tool(Tool::Hand);
        c.pointer_down(&HitTarget::Background);
        c.pointer_move(Vector::new(20.0, 20.0));
        c.pointer_up();
        c.set_tool(Tool::Relationship);
        c.click(&HitTarget::Column(ColumnRef::new("users", "users_id")))
            .unwrap();

        assert!(!c.document().can_undo());
        assert!(!c.document().can_redo());
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    #[test]
    fn test_pan_deltas_accumulate() {
        let mut c = demo_controller();
        c.set_tool(Tool::Hand);
        let start = c.interaction().canvas_offset();

        c.pointer_down(&HitTarget::Background);
        c.pointer_move(Vector::new(5.0, 0.0));
        c.pointer_move(Vector::new(3.0, 2.0));
        c.pointer_up();

        assert_eq!(c.interaction().canvas_offset() - start, Vector::new(8.0, 2.0));
        assert!(!c.interaction().is_panning());
    }

    #[test]
    fn test_tool_switch_resets_from_every_tool() {
        for from in Tool::all() {
            for to in Tool::all() {
                let mut state = InteractionState::new(from);
                // Only starts a connection when `from` is the relationship tool
                let _ = state.click_column(ColumnRef::new("users", "users_id"));
                state.select_column(ColumnRef::new("posts", "posts_title"));

                state.set_tool(to);
                assert!(!state.is_connecting(), "{:?} -> {:?}", from, to);
                assert!(state.selection().is_empty(), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn test_delete_table_mid_connection_leaves_no_dangling_start() {
        let mut c = demo_controller();
        c.set_tool(Tool::Relationship);
        c.click(&HitTarget::Column(ColumnRef::new("users", "users_id")))
            .unwrap();
        assert!(c.interaction().is_connecting());

        let _ = c.delete_table(&"users".into());

        assert!(c.interaction().connection_start().is_none());
        // The next column click starts a fresh attempt rather than completing onto a ghost
        c.click(&HitTarget::Column(ColumnRef::new("posts", "posts_id")))
            .unwrap();
        assert_eq!(
            c.interaction().connection_start(),
            Some(&ColumnRef::new("posts", "posts_id"))
        );
        assert!(c.store().foreign_keys().iter().all(|fk| !fk.touches_table(&"users".into())));
    }

    #[test]
    fn test_undo_restoring_deleted_table_keeps_state_consistent() {
        let mut c = demo_controller();
        c.set_tool(Tool::Relationship);
        c.click(&HitTarget::Column(ColumnRef::new("posts", "posts_title")))
            .unwrap();
        let _ = c.delete_column(&ColumnRef::new("posts", "posts_title"));
        assert!(!c.interaction().is_connecting());

        c.undo();
        assert!(c.store().contains_column(&ColumnRef::new("posts", "posts_title")));
        assert!(!c.interaction().is_connecting());
    }

    // ========================================================================
    // Routing
    // ========================================================================

    #[test]
    fn test_horizontal_pair_routes_right_edge_to_left_edge() {
        let router = ConnectorRouter::default();
        let source = Endpoint::new(BoundingBox::new(40.0, 90.0, 200.0, 100.0), None);
        let target = Endpoint::new(BoundingBox::new(340.0, 90.0, 200.0, 100.0), None);

        let first = router.route(&source, &target);
        assert_eq!(first.start().x, 240.0);
        assert_eq!(first.end().x, 340.0);
        assert_eq!(router.route(&source, &target), first);
    }

    #[test]
    fn test_drag_invalidates_routes() {
        let mut c = demo_controller();
        let metrics = LayoutMetrics::new(c.store().tables());
        let before = c.routes(&metrics).to_vec();

        c.pointer_down(&HitTarget::Table("users".into()));
        c.pointer_move(Vector::new(0.0, 200.0));
        c.pointer_up();
        assert!(c.routes_stale());

        let metrics = LayoutMetrics::new(c.store().tables());
        let after = c.routes(&metrics).to_vec();
        assert_eq!(before.len(), after.len());
        assert_ne!(before, after);
    }

    #[test]
    fn test_partially_measurable_schema_skips_missing_paths() {
        let mut c = demo_controller();
        let all = LayoutMetrics::new(c.store().tables());
        let without_users = move |element: &ElementRef| match element {
            ElementRef::Table(id) if id == "users" => None,
            ElementRef::Column(column) if column.table_id == "users" => None,
            other => crate::core::MeasurementProvider::measure(&all, other),
        };

        let routes = c.routes(&without_users);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].foreign_key_id, "fk_comments_posts");
    }

    // ========================================================================
    // Full editing session
    // ========================================================================

    #[test]
    fn test_editing_session() {
        let mut c = CanvasController::with_generator(
            EditorConfig::default(),
            IdGenerator::with_session("s"),
        );

        c.set_tool(Tool::Table);
        c.answer_name(Some("authors".into())).unwrap();
        c.set_tool(Tool::Table);
        c.answer_name(Some("books".into())).unwrap();

        let authors = c.store().tables()[0].clone();
        let books = c.store().tables()[1].clone();
        assert_ne!(authors.position, books.position);

        c.set_tool(Tool::Edit);
        c.click(&HitTarget::Table(books.id.clone())).unwrap();
        let _ = c.add_column(&books.id, "author_id", SqlDataType::Int).unwrap();
        let author_id = c.store().table(&books.id).unwrap().columns[1].id.clone();

        c.set_tool(Tool::Relationship);
        c.click(&HitTarget::Column(ColumnRef::new(books.id.clone(), author_id)))
            .unwrap();
        c.click(&HitTarget::Column(ColumnRef::new(
            authors.id.clone(),
            authors.columns[0].id.clone(),
        )))
        .unwrap();
        assert_eq!(c.store().foreign_keys().len(), 1);

        let metrics = LayoutMetrics::new(c.store().tables());
        assert_eq!(c.routes(&metrics).len(), 1);

        // tables, column, relationship
        assert_eq!(c.document().history_depth(), 4);
        while c.undo() {}
        assert!(c.snapshot().is_empty());
    }
}
