//! Canvas controller
//!
//! The only place where pointer/keyboard input meets both the interaction state
//! and the schema document. Prompts to the host (naming, delete confirmation)
//! are explicit continuations: the controller parks a [`PendingPrompt`] and
//! resumes when the host calls [`CanvasController::answer_name`] or
//! [`CanvasController::answer_confirm`].

use crate::core::config::EditorConfig;
use crate::core::error::{Outcome, SchemaError};
use crate::core::history::SchemaDocument;
use crate::core::ids::{EntityId, IdGenerator, IdKind};
use crate::core::interaction::{ConnectionStep, InteractionState, Tool, Vector};
use crate::core::router::{ConnectorRouter, MeasurementProvider, PathDescriptor};
use crate::core::schema::{
    Column, ColumnDraft, ColumnRef, ForeignKey, SchemaSnapshot, SqlDataType, Table,
};
use crate::core::store::SchemaStore;
use crate::core::validation::{default_table_name, name_warnings, validate_name};

/// What the pointer is over
#[derive(Clone, Debug, PartialEq)]
pub enum HitTarget {
    Background,
    Table(EntityId),
    Column(ColumnRef),
    ForeignKey(EntityId),
}

/// Entity a delete confirmation is about
#[derive(Clone, Debug, PartialEq)]
pub enum DeleteTarget {
    Table(EntityId),
    Column(ColumnRef),
    ForeignKey(EntityId),
}

/// Question the host has to answer before the controller can continue
#[derive(Clone, Debug, PartialEq)]
pub enum PendingPrompt {
    NameTable { default_name: String },
    RenameTable { table_id: EntityId, current: String },
    ConfirmDelete { target: DeleteTarget, message: String },
}

/// Key press as seen by the canvas
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Result of a handled key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Undo,
    Redo,
    Cancel,
}

/// A foreign key together with its routed path
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedConnector {
    pub foreign_key_id: EntityId,
    pub path: PathDescriptor,
}

pub type ChangeObserver = Box<dyn FnMut(&SchemaSnapshot) + Send + Sync>;

pub struct CanvasController {
    document: SchemaDocument,
    interaction: InteractionState,
    ids: IdGenerator,
    config: EditorConfig,
    router: ConnectorRouter,
    prompt: Option<PendingPrompt>,
    routes: Vec<RoutedConnector>,
    routes_stale: bool,
    failure: Option<String>,
    on_change: Option<ChangeObserver>,
}

impl std::fmt::Debug for CanvasController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasController")
            .field("document", &self.document)
            .field("interaction", &self.interaction)
            .field("prompt", &self.prompt)
            .field("routes_stale", &self.routes_stale)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_generator(config, IdGenerator::new())
    }

    /// Controller with a caller-supplied id generator (deterministic ids in tests)
    pub fn with_generator(config: EditorConfig, ids: IdGenerator) -> Self {
        Self {
            document: SchemaDocument::new(config.history_limit),
            interaction: InteractionState::default(),
            ids,
            router: config.router(),
            config,
            prompt: None,
            routes: Vec::new(),
            routes_stale: true,
            failure: None,
            on_change: None,
        }
    }

    /// Register the host callback notified after every structural change
    pub fn set_on_change(&mut self, observer: impl FnMut(&SchemaSnapshot) + Send + Sync + 'static) {
        self.on_change = Some(Box::new(observer));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    pub fn store(&self) -> &SchemaStore {
        self.document.store()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> Tool {
        self.interaction.tool()
    }

    pub fn prompt(&self) -> Option<&PendingPrompt> {
        self.prompt.as_ref()
    }

    pub fn snapshot(&self) -> SchemaSnapshot {
        self.document.snapshot()
    }

    /// Last edit the store refused, until dismissed
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn dismiss_failure(&mut self) {
        self.failure = None;
    }

    fn report(&mut self, err: &SchemaError) {
        tracing::warn!(%err, "edit rejected");
        self.failure = Some(err.to_string());
    }

    // ========================================================================
    // Document lifecycle
    // ========================================================================

    /// Replace the schema (initial load from the host). Not undoable.
    pub fn load(&mut self, snapshot: SchemaSnapshot) {
        self.document.load(snapshot);
        self.resync_interaction();
        self.prompt = None;
        self.invalidate_routes();
    }

    /// Undo and drop interaction references the restored state no longer has
    pub fn undo(&mut self) -> bool {
        let changed = self.document.undo();
        if changed {
            self.after_history_step();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.document.redo();
        if changed {
            self.after_history_step();
        }
        changed
    }

    pub fn clear_history(&mut self) {
        self.document.clear_history();
    }

    fn after_history_step(&mut self) {
        self.resync_interaction();
        self.invalidate_routes();
        self.notify();
    }

    fn resync_interaction(&mut self) {
        let store = self.document.store();
        self.interaction.retain_existing(
            |table_id| store.table(table_id).is_some(),
            |column| store.contains_column(column),
        );
    }

    fn notify(&mut self) {
        if let Some(observer) = self.on_change.as_mut() {
            observer(&self.document.snapshot());
        }
    }

    // ========================================================================
    // Tools
    // ========================================================================

    /// Switch tool. Entering the Table tool asks the host for a name.
    pub fn set_tool(&mut self, tool: Tool) {
        self.interaction.set_tool(tool);
        if matches!(self.prompt, Some(PendingPrompt::NameTable { .. })) {
            self.prompt = None;
        }
        if tool == Tool::Table {
            let existing: Vec<&str> = self.store().tables().iter().map(|t| t.name.as_str()).collect();
            self.prompt = Some(PendingPrompt::NameTable {
                default_name: default_table_name(&existing),
            });
        }
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Pointer pressed. Returns true if a pan or drag started.
    pub fn pointer_down(&mut self, target: &HitTarget) -> bool {
        match (self.tool(), target) {
            (Tool::Hand, HitTarget::Background) => self.interaction.begin_pan(),
            (Tool::Move, HitTarget::Table(table_id)) => self.interaction.begin_drag(table_id.clone()),
            (Tool::Move, HitTarget::Column(column)) => {
                self.interaction.begin_drag(column.table_id.clone())
            }
            _ => false,
        }
    }

    /// Relative pointer movement since the last event
    pub fn pointer_move(&mut self, delta: Vector) {
        if self.interaction.pan_by(delta) || self.interaction.drag_by(delta) {
            self.routes_stale = true;
        }
    }

    /// Pointer released: ends a pan, commits a drag as one table update
    pub fn pointer_up(&mut self) {
        self.interaction.end_pan();
        let Some(drag) = self.interaction.finish_drag() else {
            return;
        };
        if drag.delta == Vector::ZERO {
            return;
        }
        let Some(table) = self.store().table(&drag.table_id) else {
            tracing::warn!(table_id = %drag.table_id, "drag finished on a deleted table");
            return;
        };
        let mut moved = table.clone();
        moved.position = moved.position.offset(drag.delta.x, drag.delta.y);
        match self.document.update_table(moved) {
            Ok(Outcome::Applied) => {
                self.invalidate_routes();
                self.notify();
            }
            Ok(Outcome::NotFound) => {}
            Err(err) => self.report(&err),
        }
    }

    /// Pointer left the canvas: same as release
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Click dispatch by tool
    pub fn click(&mut self, target: &HitTarget) -> Result<(), SchemaError> {
        match (self.tool(), target) {
            (Tool::Edit, HitTarget::Table(table_id)) => {
                self.interaction.select_table(table_id.clone());
            }
            (Tool::Edit, HitTarget::Column(column)) => {
                self.interaction.select_column(column.clone());
            }
            (Tool::Move, HitTarget::Table(table_id)) => {
                self.interaction.select_table(table_id.clone());
            }
            (Tool::Move, HitTarget::Background) => {
                self.interaction.clear_selection();
            }
            (Tool::Relationship, HitTarget::Column(column)) => {
                if let ConnectionStep::Completed { source, target } =
                    self.interaction.click_column(column.clone())
                {
                    if let Err(err) = self.create_foreign_key(source, target) {
                        self.report(&err);
                        return Err(err);
                    }
                }
            }
            (Tool::Move | Tool::Edit, HitTarget::ForeignKey(fk_id)) => {
                self.request_delete(DeleteTarget::ForeignKey(fk_id.clone()));
            }
            _ => {}
        }
        Ok(())
    }

    /// Uncommitted drag offset of a table, for rendering during a move
    pub fn drag_preview(&self, table_id: &EntityId) -> Vector {
        match self.interaction.drag() {
            Some(drag) if &drag.table_id == table_id => drag.delta,
            _ => Vector::ZERO,
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn key_down(&mut self, key: &KeyInput) -> Option<KeyAction> {
        let modifier = key.ctrl || key.meta;
        let action = match key.key.to_ascii_lowercase().as_str() {
            "z" if modifier && key.shift => KeyAction::Redo,
            "z" if modifier => KeyAction::Undo,
            "y" if modifier => KeyAction::Redo,
            "escape" => KeyAction::Cancel,
            _ => return None,
        };
        match action {
            KeyAction::Undo => {
                self.undo();
            }
            KeyAction::Redo => {
                self.redo();
            }
            KeyAction::Cancel => self.cancel(),
        }
        Some(action)
    }

    /// Escape: abandon a half-made relationship and any drag
    pub fn cancel(&mut self) {
        self.interaction.cancel_connection();
        self.interaction.cancel_drag();
        self.interaction.end_pan();
        self.routes_stale = true;
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    fn create_foreign_key(&mut self, source: ColumnRef, target: ColumnRef) -> Result<(), SchemaError> {
        let fk = ForeignKey::new(self.ids.next(IdKind::ForeignKey), source, target);
        tracing::debug!(fk = %fk.id, "creating relationship");
        self.document.add_foreign_key(fk)?;
        self.invalidate_routes();
        self.notify();
        Ok(())
    }

    /// Append a column to a table (Edit tool)
    pub fn add_column(
        &mut self,
        table_id: &EntityId,
        name: &str,
        data_type: SqlDataType,
    ) -> Result<Outcome, SchemaError> {
        let name = validate_name(name)?;
        let mut column = Column::new(self.ids.next(IdKind::Column), name, data_type);
        if data_type.requires_length() {
            column = column.with_length(255);
        }
        let outcome = self.document.add_column(table_id, column)?;
        if outcome.is_applied() {
            self.invalidate_routes();
            self.notify();
        }
        Ok(outcome)
    }

    /// Replace a column definition (Edit tool)
    pub fn update_column(&mut self, table_id: &EntityId, column: Column) -> Result<Outcome, SchemaError> {
        validate_name(&column.name)?;
        let outcome = self.document.update_column(table_id, column)?;
        if outcome.is_applied() {
            self.invalidate_routes();
            self.notify();
        }
        Ok(outcome)
    }

    /// Save the column form for an existing column
    pub fn save_column(&mut self, column: &ColumnRef, draft: &ColumnDraft) -> Result<Outcome, SchemaError> {
        let updated = draft.build(column.column_id.clone())?;
        self.update_column(&column.table_id, updated)
    }

    /// Reorder a column (Edit tool)
    pub fn move_column(&mut self, table_id: &EntityId, from: usize, to: usize) -> Result<Outcome, SchemaError> {
        let outcome = self.document.move_column(table_id, from, to)?;
        if outcome.is_applied() {
            self.invalidate_routes();
            self.notify();
        }
        Ok(outcome)
    }

    /// Close the Edit panel
    pub fn clear_selection(&mut self) {
        self.interaction.clear_selection();
    }

    /// Delete a table immediately, keeping interaction state free of references to it
    pub fn delete_table(&mut self, table_id: &EntityId) -> Outcome {
        let outcome = self.document.delete_table(table_id);
        self.interaction.forget_table(table_id);
        if outcome.is_applied() {
            self.invalidate_routes();
            self.notify();
        }
        outcome
    }

    pub fn delete_column(&mut self, column: &ColumnRef) -> Outcome {
        let outcome = self.document.delete_column(column);
        self.interaction.forget_column(column);
        if outcome.is_applied() {
            self.invalidate_routes();
            self.notify();
        }
        outcome
    }

    pub fn delete_foreign_key(&mut self, fk_id: &EntityId) -> Outcome {
        let outcome = self.document.delete_foreign_key(fk_id);
        if outcome.is_applied() {
            self.invalidate_routes();
            self.notify();
        }
        outcome
    }

    // ========================================================================
    // Prompts
    // ========================================================================

    /// Ask the host to confirm a delete
    pub fn request_delete(&mut self, target: DeleteTarget) {
        let message = self.delete_message(&target);
        self.prompt = Some(PendingPrompt::ConfirmDelete { target, message });
    }

    /// Ask the host for a new table name
    pub fn request_rename(&mut self, table_id: &EntityId) {
        let Some(table) = self.store().table(table_id) else {
            tracing::warn!(table_id = %table_id, "rename requested for missing table");
            return;
        };
        self.prompt = Some(PendingPrompt::RenameTable {
            table_id: table_id.clone(),
            current: table.name.clone(),
        });
    }

    fn delete_message(&self, target: &DeleteTarget) -> String {
        let store = self.store();
        let column_label = |column: &ColumnRef| -> String {
            match (store.table(&column.table_id), store.column(column)) {
                (Some(table), Some(col)) => format!("{}.{}", table.name, col.name),
                _ => format!("{}.{}", column.table_id, column.column_id),
            }
        };
        match target {
            DeleteTarget::Table(table_id) => {
                let name = store.table(table_id).map_or(table_id.as_str(), |t| t.name.as_str());
                format!(
                    "Are you sure you want to delete table \"{}\"? Its relationships will be removed too.",
                    name
                )
            }
            DeleteTarget::Column(column) => {
                format!("Are you sure you want to delete column \"{}\"?", column_label(column))
            }
            DeleteTarget::ForeignKey(fk_id) => match store.foreign_key(fk_id) {
                Some(fk) => format!(
                    "Are you sure you want to delete the foreign key relationship between \"{}\" and \"{}\"?",
                    column_label(&fk.source()),
                    column_label(&fk.target())
                ),
                None => "Are you sure you want to delete this relationship?".to_string(),
            },
        }
    }

    /// Answer a naming prompt. `None` cancels.
    ///
    /// Returns `Ok(true)` when a table was created or renamed. An invalid name
    /// leaves the prompt pending so the host can ask again.
    pub fn answer_name(&mut self, answer: Option<String>) -> Result<bool, SchemaError> {
        let prompt = match self.prompt.take() {
            Some(p @ (PendingPrompt::NameTable { .. } | PendingPrompt::RenameTable { .. })) => p,
            other => {
                self.prompt = other;
                return Ok(false);
            }
        };

        let Some(raw) = answer else {
            if matches!(prompt, PendingPrompt::NameTable { .. }) {
                self.interaction.set_tool(Tool::Move);
            }
            return Ok(false);
        };

        let name = match validate_name(&raw) {
            Ok(name) => name,
            Err(err) => {
                self.prompt = Some(prompt);
                return Err(err.into());
            }
        };
        for warning in name_warnings(&name) {
            tracing::warn!(name = %name, %warning, "table name accepted with warning");
        }

        match self.apply_name(&prompt, name) {
            Ok(true) => {
                self.invalidate_routes();
                self.notify();
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => {
                // Keep the dialog open so it can show the failure
                tracing::warn!(%err, "naming rejected");
                self.prompt = Some(prompt);
                Err(err)
            }
        }
    }

    fn apply_name(&mut self, prompt: &PendingPrompt, name: String) -> Result<bool, SchemaError> {
        match prompt {
            PendingPrompt::NameTable { .. } => {
                let (x, y) = self.config.new_table_position(self.store().tables().len());
                let table = Table::new(self.ids.next(IdKind::Table), name)
                    .with_position(x, y)
                    .with_column(Column::default_primary_key(self.ids.next(IdKind::Column)));
                self.document.add_table(table)?;
                tracing::info!(tables = self.store().tables().len(), "table created");
                self.interaction.set_tool(Tool::Move);
                Ok(true)
            }
            PendingPrompt::RenameTable { table_id, .. } => {
                let Some(table) = self.store().table(table_id) else {
                    return Ok(false);
                };
                let mut renamed = table.clone();
                renamed.name = name;
                Ok(self.document.update_table(renamed)?.is_applied())
            }
            PendingPrompt::ConfirmDelete { .. } => Ok(false),
        }
    }

    /// Answer a delete confirmation. Returns true if something was deleted.
    pub fn answer_confirm(&mut self, confirmed: bool) -> bool {
        let target = match self.prompt.take() {
            Some(PendingPrompt::ConfirmDelete { target, .. }) => target,
            other => {
                self.prompt = other;
                return false;
            }
        };
        if !confirmed {
            return false;
        }
        let outcome = match &target {
            DeleteTarget::Table(table_id) => self.delete_table(table_id),
            DeleteTarget::Column(column) => self.delete_column(column),
            DeleteTarget::ForeignKey(fk_id) => self.delete_foreign_key(fk_id),
        };
        outcome.is_applied()
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Mark connector paths as needing recomputation (structure, move, pan,
    /// resize or scroll changed)
    pub fn invalidate_routes(&mut self) {
        self.routes_stale = true;
    }

    pub fn routes_stale(&self) -> bool {
        self.routes_stale
    }

    /// Connector paths for every measurable foreign key. Recomputed only when stale.
    pub fn routes(&mut self, measurement: &impl MeasurementProvider) -> &[RoutedConnector] {
        if self.routes_stale {
            self.routes = self
                .document
                .store()
                .foreign_keys()
                .iter()
                .filter_map(|fk| {
                    self.router
                        .route_foreign_key(fk, measurement)
                        .map(|path| RoutedConnector {
                            foreign_key_id: fk.id.clone(),
                            path,
                        })
                })
                .collect();
            self.routes_stale = false;
        }
        &self.routes
    }
}
