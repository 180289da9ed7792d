//! Orthogonal connector routing between table boxes
//!
//! [`ConnectorRouter::route`] turns two measured endpoints into a
//! [`PathDescriptor`]: a straight segment when the anchors are nearly level, and
//! otherwise horizontal → vertical → horizontal with quarter-turn rounded corners
//! around a vertical midline. The router is a pure function of its inputs.
//!
//! Measurement goes through [`MeasurementProvider`] so the same code runs against
//! the live DOM and against synthetic boxes in tests ([`LayoutMetrics`]).

use std::fmt::Write;

use crate::core::ids::EntityId;
use crate::core::schema::{ColumnRef, ForeignKey, Table};

/// Default corner radius of connector turns
pub const CORNER_RADIUS: f64 = 12.0;

/// Minimum horizontal run before the first turn
pub const MIN_OFFSET: f64 = 30.0;

/// A point in canvas coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shift by a translation (e.g. to canvas space from viewport space)
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Element the presentation layer can measure
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Table(EntityId),
    Column(ColumnRef),
}

/// Source of current on-screen boxes. `None` means unmounted or unmeasurable.
pub trait MeasurementProvider {
    fn measure(&self, element: &ElementRef) -> Option<BoundingBox>;
}

impl<F> MeasurementProvider for F
where
    F: Fn(&ElementRef) -> Option<BoundingBox>,
{
    fn measure(&self, element: &ElementRef) -> Option<BoundingBox> {
        self(element)
    }
}

/// One side of a connector: the owning table box and, when measurable, the column row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoint {
    pub table: BoundingBox,
    pub row: Option<BoundingBox>,
}

impl Endpoint {
    pub fn new(table: BoundingBox, row: Option<BoundingBox>) -> Self {
        Self { table, row }
    }

    /// Vertical anchor: centre of the column row, else centre of the table
    pub fn anchor_y(&self) -> f64 {
        self.row.unwrap_or(self.table).center().y
    }
}

/// Dominant separation between the two table centres
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Path drawing command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through `control` ending at `to`
    QuadTo { control: Point, to: Point },
}

/// Renderable connector geometry
#[derive(Clone, Debug, PartialEq)]
pub enum PathDescriptor {
    Straight {
        from: Point,
        to: Point,
    },
    Orthogonal {
        from: Point,
        to: Point,
        midline_x: f64,
        dominant: Axis,
        commands: Vec<PathCommand>,
    },
}

impl PathDescriptor {
    pub fn start(&self) -> Point {
        match self {
            PathDescriptor::Straight { from, .. } | PathDescriptor::Orthogonal { from, .. } => {
                *from
            }
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathDescriptor::Straight { to, .. } | PathDescriptor::Orthogonal { to, .. } => *to,
        }
    }

    pub fn is_straight(&self) -> bool {
        matches!(self, PathDescriptor::Straight { .. })
    }

    /// Drawing commands, straight paths included
    pub fn commands(&self) -> Vec<PathCommand> {
        match self {
            PathDescriptor::Straight { from, to } => {
                vec![PathCommand::MoveTo(*from), PathCommand::LineTo(*to)]
            }
            PathDescriptor::Orthogonal { commands, .. } => commands.clone(),
        }
    }

    /// Midpoint between the anchors; labels sit 10 units above it
    pub fn label_point(&self) -> Point {
        let (a, b) = (self.start(), self.end());
        Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0 - 10.0)
    }

    /// SVG `d` attribute
    pub fn svg_path(&self) -> String {
        let mut d = String::new();
        for command in self.commands() {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing to a String cannot fail
            let _ = match command {
                PathCommand::MoveTo(p) => write!(d, "M {} {}", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L {} {}", p.x, p.y),
                PathCommand::QuadTo { control, to } => {
                    write!(d, "Q {} {} {} {}", control.x, control.y, to.x, to.y)
                }
            };
        }
        d
    }
}

/// Routing parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorRouter {
    pub corner_radius: f64,
    pub min_offset: f64,
}

impl Default for ConnectorRouter {
    fn default() -> Self {
        Self {
            corner_radius: CORNER_RADIUS,
            min_offset: MIN_OFFSET,
        }
    }
}

impl ConnectorRouter {
    pub fn new(corner_radius: f64, min_offset: f64) -> Self {
        Self {
            corner_radius,
            min_offset,
        }
    }

    /// Route between two endpoints.
    ///
    /// The connector always leaves and enters through the vertical edges that
    /// face each other, whichever axis dominates.
    pub fn route(&self, source: &Endpoint, target: &Endpoint) -> PathDescriptor {
        let source_center = source.table.center();
        let target_center = target.table.center();

        let dominant = if (target_center.x - source_center.x).abs()
            > (target_center.y - source_center.y).abs()
        {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };

        let (from_x, to_x) = if target_center.x > source_center.x {
            (source.table.right(), target.table.left())
        } else {
            (source.table.left(), target.table.right())
        };

        let from = Point::new(from_x, source.anchor_y());
        let to = Point::new(to_x, target.anchor_y());
        self.route_points(from, to, dominant)
    }

    /// Route between two resolved anchor points.
    ///
    /// The vertical run sits at least `min_offset` out from `from`. When the
    /// anchors are closer than `min_offset + corner_radius` horizontally, the
    /// run lands past `to.x` and the last segment doubles back into the target.
    pub fn route_points(&self, from: Point, to: Point, dominant: Axis) -> PathDescriptor {
        let r = self.corner_radius;
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        // Too close to fit two corners, or nearly level: a single segment
        if dy.abs() < r * 2.0 {
            return PathDescriptor::Straight { from, to };
        }

        let h = if dx < 0.0 { -1.0 } else { 1.0 };
        let v = if dy > 0.0 { 1.0 } else { -1.0 };
        let midline_x = from.x + h * self.min_offset.max(dx.abs() / 2.0);

        let commands = vec![
            PathCommand::MoveTo(from),
            PathCommand::LineTo(Point::new(midline_x - h * r, from.y)),
            PathCommand::QuadTo {
                control: Point::new(midline_x, from.y),
                to: Point::new(midline_x, from.y + v * r),
            },
            PathCommand::LineTo(Point::new(midline_x, to.y - v * r)),
            PathCommand::QuadTo {
                control: Point::new(midline_x, to.y),
                to: Point::new(midline_x + h * r, to.y),
            },
            PathCommand::LineTo(to),
        ];

        PathDescriptor::Orthogonal {
            from,
            to,
            midline_x,
            dominant,
            commands,
        }
    }

    /// Measure a foreign key's endpoints and route it.
    ///
    /// Returns `None` when either table cannot be measured. An unmeasurable
    /// column row falls back to the table centre.
    pub fn route_foreign_key(
        &self,
        fk: &ForeignKey,
        measurement: &impl MeasurementProvider,
    ) -> Option<PathDescriptor> {
        let endpoint = |column: ColumnRef| -> Option<Endpoint> {
            let table = measurement.measure(&ElementRef::Table(column.table_id.clone()))?;
            let row = measurement.measure(&ElementRef::Column(column));
            Some(Endpoint::new(table, row))
        };

        let source = endpoint(fk.source())?;
        let target = endpoint(fk.target())?;
        Some(self.route(&source, &target))
    }
}

/// Fixed card metrics used to compute boxes without a rendering surface
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutMetrics {
    pub table_width: f64,
    pub header_height: f64,
    pub padding_top: f64,
    pub row_height: f64,
    pub padding_bottom: f64,
    tables: Vec<Table>,
}

impl LayoutMetrics {
    pub fn new(tables: &[Table]) -> Self {
        Self {
            table_width: 280.0,
            header_height: 48.0,
            padding_top: 8.0,
            row_height: 36.0,
            padding_bottom: 8.0,
            tables: tables.to_vec(),
        }
    }

    fn table_box(&self, table: &Table) -> BoundingBox {
        let height = self.header_height
            + self.padding_top
            + table.columns.len() as f64 * self.row_height
            + self.padding_bottom;
        BoundingBox::new(table.position.x, table.position.y, self.table_width, height)
    }
}

impl MeasurementProvider for LayoutMetrics {
    fn measure(&self, element: &ElementRef) -> Option<BoundingBox> {
        match element {
            ElementRef::Table(id) => self.tables.iter().find(|t| &t.id == id).map(|t| self.table_box(t)),
            ElementRef::Column(column) => {
                let table = self.tables.iter().find(|t| t.id == column.table_id)?;
                let index = table.column_index(&column.column_id)?;
                Some(BoundingBox::new(
                    table.position.x,
                    table.position.y
                        + self.header_height
                        + self.padding_top
                        + index as f64 * self.row_height,
                    self.table_width,
                    self.row_height,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, SqlDataType};

    fn endpoint(cx: f64, cy: f64) -> Endpoint {
        Endpoint::new(BoundingBox::new(cx - 100.0, cy - 50.0, 200.0, 100.0), None)
    }

    #[test]
    fn test_pure_horizontal_offset_is_straight_right_to_left() {
        let router = ConnectorRouter::default();
        let path = router.route(&endpoint(140.0, 140.0), &endpoint(440.0, 140.0));

        assert!(path.is_straight());
        assert_eq!(path.start(), Point::new(240.0, 140.0));
        assert_eq!(path.end(), Point::new(340.0, 140.0));
        assert_eq!(path.svg_path(), "M 240 140 L 340 140");
    }

    #[test]
    fn test_route_is_deterministic() {
        let router = ConnectorRouter::default();
        let a = endpoint(140.0, 140.0);
        let b = endpoint(440.0, 340.0);
        let first = router.route(&a, &b);
        for _ in 0..10 {
            assert_eq!(router.route(&a, &b), first);
        }
    }

    #[test]
    fn test_rightward_downward_corners() {
        let router = ConnectorRouter::default();
        let path = router.route_points(
            Point::new(0.0, 0.0),
            Point::new(200.0, 100.0),
            Axis::Horizontal,
        );
        assert_eq!(
            path.svg_path(),
            "M 0 0 L 88 0 Q 100 0 100 12 L 100 88 Q 100 100 112 100 L 200 100"
        );
    }

    #[test]
    fn test_rightward_upward_corners() {
        let router = ConnectorRouter::default();
        let path = router.route_points(
            Point::new(0.0, 100.0),
            Point::new(200.0, 0.0),
            Axis::Horizontal,
        );
        assert_eq!(
            path.svg_path(),
            "M 0 100 L 88 100 Q 100 100 100 88 L 100 12 Q 100 0 112 0 L 200 0"
        );
    }

    #[test]
    fn test_leftward_downward_corners() {
        let router = ConnectorRouter::default();
        let path = router.route_points(
            Point::new(200.0, 0.0),
            Point::new(0.0, 100.0),
            Axis::Horizontal,
        );
        assert_eq!(
            path.svg_path(),
            "M 200 0 L 112 0 Q 100 0 100 12 L 100 88 Q 100 100 88 100 L 0 100"
        );
    }

    #[test]
    fn test_leftward_upward_corners() {
        let router = ConnectorRouter::default();
        let path = router.route_points(
            Point::new(200.0, 100.0),
            Point::new(0.0, 0.0),
            Axis::Horizontal,
        );
        assert_eq!(
            path.svg_path(),
            "M 200 100 L 112 100 Q 100 100 100 88 L 100 12 Q 100 0 88 0 L 0 0"
        );
    }

    #[test]
    fn test_midline_respects_min_offset() {
        let router = ConnectorRouter::default();
        let path = router.route_points(
            Point::new(0.0, 0.0),
            Point::new(20.0, 200.0),
            Axis::Vertical,
        );
        match path {
            PathDescriptor::Orthogonal {
                midline_x,
                dominant,
                ..
            } => {
                assert_eq!(midline_x, 30.0);
                assert_eq!(dominant, Axis::Vertical);
            }
            other => panic!("expected orthogonal path, got {:?}", other),
        }
    }

    #[test]
    fn test_close_anchors_overshoot_then_double_back() {
        let router = ConnectorRouter::default();
        let from = Point::new(0.0, 0.0);
        let to = Point::new(20.0, 200.0);
        let path = router.route_points(from, to, Axis::Vertical);

        let commands = path.commands();
        assert_eq!(commands.first(), Some(&PathCommand::MoveTo(from)));
        // Second corner ends right of the target, then the path comes back
        assert_eq!(
            commands[4],
            PathCommand::QuadTo {
                control: Point::new(MIN_OFFSET, 200.0),
                to: Point::new(MIN_OFFSET + CORNER_RADIUS, 200.0),
            }
        );
        assert_eq!(commands.last(), Some(&PathCommand::LineTo(to)));
        assert_eq!(path.end(), to);
    }

    #[test]
    fn test_close_points_degrade_to_straight() {
        let router = ConnectorRouter::default();
        let path = router.route_points(
            Point::new(0.0, 0.0),
            Point::new(40.0, 10.0),
            Axis::Horizontal,
        );
        assert!(path.is_straight());
    }

    #[test]
    fn test_target_left_exits_left_edge() {
        let router = ConnectorRouter::default();
        let path = router.route(&endpoint(600.0, 100.0), &endpoint(100.0, 400.0));
        assert_eq!(path.start().x, 500.0);
        assert_eq!(path.end().x, 200.0);
        assert!(!path.is_straight());
    }

    #[test]
    fn test_vertical_dominance_still_uses_side_edges() {
        let router = ConnectorRouter::default();
        let path = router.route(&endpoint(100.0, 100.0), &endpoint(150.0, 600.0));
        match &path {
            PathDescriptor::Orthogonal { dominant, .. } => assert_eq!(*dominant, Axis::Vertical),
            other => panic!("expected orthogonal path, got {:?}", other),
        }
        assert_eq!(path.start().x, 200.0);
        assert_eq!(path.end().x, 50.0);
    }

    #[test]
    fn test_anchor_prefers_column_row() {
        let table = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let row = BoundingBox::new(0.0, 60.0, 100.0, 20.0);
        assert_eq!(Endpoint::new(table, Some(row)).anchor_y(), 70.0);
        assert_eq!(Endpoint::new(table, None).anchor_y(), 100.0);
    }

    #[test]
    fn test_route_foreign_key_with_layout_metrics() {
        let users = Table::new("users", "users")
            .with_position(0.0, 0.0)
            .with_column(Column::default_primary_key("id"));
        let posts = Table::new("posts", "posts")
            .with_position(500.0, 200.0)
            .with_column(Column::default_primary_key("pid"))
            .with_column(Column::new("uid", "user_id", SqlDataType::Int));
        let fk = ForeignKey::new(
            "fk",
            ColumnRef::new("posts", "uid"),
            ColumnRef::new("users", "id"),
        );
        let metrics = LayoutMetrics::new(&[users, posts]);

        let path = ConnectorRouter::default()
            .route_foreign_key(&fk, &metrics)
            .unwrap();

        // posts is right of users: leave posts' left edge, enter users' right edge
        assert_eq!(path.start(), Point::new(500.0, 200.0 + 48.0 + 8.0 + 36.0 + 18.0));
        assert_eq!(path.end(), Point::new(280.0, 48.0 + 8.0 + 18.0));
    }

    #[test]
    fn test_unmeasurable_table_yields_no_path() {
        let fk = ForeignKey::new("fk", ColumnRef::new("a", "x"), ColumnRef::new("b", "y"));
        let nothing = |_: &ElementRef| -> Option<BoundingBox> { None };
        assert!(ConnectorRouter::default().route_foreign_key(&fk, &nothing).is_none());
    }

    #[test]
    fn test_unmeasurable_column_falls_back_to_table_center() {
        let fk = ForeignKey::new("fk", ColumnRef::new("a", "x"), ColumnRef::new("b", "y"));
        let tables_only = |element: &ElementRef| match element {
            ElementRef::Table(id) if id == "a" => Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0)),
            ElementRef::Table(_) => Some(BoundingBox::new(300.0, 200.0, 100.0, 100.0)),
            ElementRef::Column(_) => None,
        };
        let path = ConnectorRouter::default()
            .route_foreign_key(&fk, &tables_only)
            .unwrap();
        assert_eq!(path.start(), Point::new(100.0, 50.0));
        assert_eq!(path.end(), Point::new(300.0, 250.0));
    }

    #[test]
    fn test_label_point_sits_above_midpoint() {
        let path = PathDescriptor::Straight {
            from: Point::new(0.0, 0.0),
            to: Point::new(100.0, 40.0),
        };
        assert_eq!(path.label_point(), Point::new(50.0, 10.0));
    }
}
