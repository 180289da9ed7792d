//! Tool-mode interaction state
//!
//! Everything here is transient UI state: it is never snapshotted and never
//! touches tables or foreign keys directly. Operations that need a structural
//! change return an intent ([`ConnectionStep::Completed`], a committed drag
//! delta) which the canvas controller applies to the document.

use crate::core::ids::EntityId;
use crate::core::schema::ColumnRef;

/// Active tool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Pan the canvas by dragging the background
    Hand,
    /// Drag tables around
    #[default]
    Move,
    /// Create a new table
    Table,
    /// Target tables and columns for structural edits
    Edit,
    /// Two-click foreign key creation
    Relationship,
}

impl Tool {
    pub fn all() -> [Tool; 5] {
        [
            Tool::Hand,
            Tool::Move,
            Tool::Table,
            Tool::Edit,
            Tool::Relationship,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Hand => "Hand",
            Tool::Move => "Move",
            Tool::Table => "New table",
            Tool::Edit => "Edit",
            Tool::Relationship => "Relationship",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::Hand => "Pan and drag the canvas",
            Tool::Move => "Move tables around",
            Tool::Table => "Add new tables",
            Tool::Edit => "Edit tables and columns",
            Tool::Relationship => "Create foreign key relationships",
        }
    }
}

/// Relationship creation progress
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    /// First endpoint chosen, waiting for the second column click
    AwaitingTarget(ColumnRef),
}

/// Result of a column click in Relationship mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionStep {
    /// Not in Relationship mode; nothing happened
    Ignored,
    /// First endpoint recorded
    Started(ColumnRef),
    /// Second click hit the starting column; attempt dropped
    Cancelled,
    /// Both endpoints chosen; the caller creates the foreign key
    Completed { source: ColumnRef, target: ColumnRef },
}

/// Current selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub table_id: Option<EntityId>,
    pub column_id: Option<EntityId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.table_id.is_none() && self.column_id.is_none()
    }
}

/// Pan translation of the drawing surface
#[derive(
    Clone, Copy, Debug, Default, PartialEq, derive_more::Add, derive_more::AddAssign, derive_more::Sub,
)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Table drag in progress: accumulated delta, committed once on drop
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    pub table_id: EntityId,
    pub delta: Vector,
}

/// Interaction state machine
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    tool: Tool,
    selection: Selection,
    connection: ConnectionState,
    canvas_offset: Vector,
    panning: bool,
    drag: Option<DragState>,
}

impl InteractionState {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.connection, ConnectionState::AwaitingTarget(_))
    }

    pub fn connection_start(&self) -> Option<&ColumnRef> {
        match &self.connection {
            ConnectionState::AwaitingTarget(start) => Some(start),
            ConnectionState::Idle => None,
        }
    }

    pub fn canvas_offset(&self) -> Vector {
        self.canvas_offset
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    // ========================================================================
    // Tool switching
    // ========================================================================

    /// Switch tool. Always resets connection, selection, panning and drag,
    /// whatever the old and new tools are.
    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!(from = ?self.tool, to = ?tool, "tool switch");
        self.tool = tool;
        self.connection = ConnectionState::Idle;
        self.selection = Selection::default();
        self.panning = false;
        self.drag = None;
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn select_table(&mut self, table_id: EntityId) {
        self.selection = Selection {
            table_id: Some(table_id),
            column_id: None,
        };
    }

    pub fn select_column(&mut self, column: ColumnRef) {
        self.selection = Selection {
            table_id: Some(column.table_id),
            column_id: Some(column.column_id),
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    // ========================================================================
    // Panning
    // ========================================================================

    /// Start panning. Only the Hand tool pans.
    pub fn begin_pan(&mut self) -> bool {
        if self.tool != Tool::Hand {
            return false;
        }
        self.panning = true;
        true
    }

    /// Add a relative pointer movement to the offset while panning
    pub fn pan_by(&mut self, delta: Vector) -> bool {
        if !self.panning {
            return false;
        }
        self.canvas_offset += delta;
        true
    }

    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    /// Set the offset directly (e.g. "reset view")
    pub fn set_canvas_offset(&mut self, offset: Vector) {
        self.canvas_offset = offset;
    }

    // ========================================================================
    // Table dragging
    // ========================================================================

    /// Start dragging a table. Only the Move tool drags.
    pub fn begin_drag(&mut self, table_id: EntityId) -> bool {
        if self.tool != Tool::Move {
            return false;
        }
        self.drag = Some(DragState {
            table_id,
            delta: Vector::ZERO,
        });
        true
    }

    pub fn drag_by(&mut self, delta: Vector) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.delta += delta;
                true
            }
            None => false,
        }
    }

    /// End the drag and hand back the total delta to commit
    pub fn finish_drag(&mut self) -> Option<DragState> {
        self.drag.take()
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    // ========================================================================
    // Relationship creation
    // ========================================================================

    /// Feed a column click into the two-phase relationship flow
    pub fn click_column(&mut self, column: ColumnRef) -> ConnectionStep {
        if self.tool != Tool::Relationship {
            return ConnectionStep::Ignored;
        }

        match std::mem::take(&mut self.connection) {
            ConnectionState::Idle => {
                self.connection = ConnectionState::AwaitingTarget(column.clone());
                ConnectionStep::Started(column)
            }
            ConnectionState::AwaitingTarget(start) if start == column => {
                tracing::debug!("relationship cancelled: same column clicked twice");
                ConnectionStep::Cancelled
            }
            ConnectionState::AwaitingTarget(source) => ConnectionStep::Completed {
                source,
                target: column,
            },
        }
    }

    /// Drop an in-progress relationship. Returns true if one was pending.
    pub fn cancel_connection(&mut self) -> bool {
        let was_connecting = self.is_connecting();
        self.connection = ConnectionState::Idle;
        was_connecting
    }

    // ========================================================================
    // Keeping references valid
    // ========================================================================

    /// Drop every reference to a deleted table
    pub fn forget_table(&mut self, table_id: &EntityId) {
        if self.selection.table_id.as_ref() == Some(table_id) {
            self.selection = Selection::default();
        }
        if self
            .connection_start()
            .is_some_and(|start| &start.table_id == table_id)
        {
            self.connection = ConnectionState::Idle;
        }
        if self.drag.as_ref().is_some_and(|d| &d.table_id == table_id) {
            self.drag = None;
        }
    }

    /// Drop every reference to a deleted column
    pub fn forget_column(&mut self, column: &ColumnRef) {
        if self.selection.table_id.as_ref() == Some(&column.table_id)
            && self.selection.column_id.as_ref() == Some(&column.column_id)
        {
            self.selection.column_id = None;
        }
        if self.connection_start() == Some(column) {
            self.connection = ConnectionState::Idle;
        }
    }

    /// Drop references that no longer resolve in the given predicate
    /// (used after undo/redo replaced the document wholesale)
    pub fn retain_existing(
        &mut self,
        table_exists: impl Fn(&EntityId) -> bool,
        column_exists: impl Fn(&ColumnRef) -> bool,
    ) {
        if let Some(table_id) = self.selection.table_id.clone() {
            if !table_exists(&table_id) {
                self.selection = Selection::default();
            } else if let Some(column_id) = self.selection.column_id.clone()
                && !column_exists(&ColumnRef::new(table_id, column_id))
            {
                self.selection.column_id = None;
            }
        }
        if self.connection_start().is_some_and(|start| !column_exists(start)) {
            self.connection = ConnectionState::Idle;
        }
        if self.drag.as_ref().is_some_and(|d| !table_exists(&d.table_id)) {
            self.drag = None;
        }
    }
}
