//! Measures rendered table cards and column rows
//!
//! Boxes are reported relative to the panned content layer, i.e. in canvas
//! coordinates, which is what the connector router expects.

use crate::core::ElementRef;
#[cfg(not(feature = "ssr"))]
use crate::core::{BoundingBox, MeasurementProvider};

/// CSS selector of a rendered element
pub fn selector(element: &ElementRef) -> String {
    match element {
        ElementRef::Table(id) => format!("[data-table-id=\"{}\"]", id),
        ElementRef::Column(column) => format!(
            "[data-table-id=\"{}\"] [data-column-id=\"{}\"]",
            column.table_id, column.column_id
        ),
    }
}

/// Live DOM measurement
#[cfg(not(feature = "ssr"))]
pub struct DomMeasurement {
    document: leptos::web_sys::Document,
    origin_x: f64,
    origin_y: f64,
}

#[cfg(not(feature = "ssr"))]
impl DomMeasurement {
    /// `content` is the element carrying the pan translation
    pub fn new(content: &leptos::web_sys::Element) -> Option<Self> {
        let document = leptos::web_sys::window()?.document()?;
        let origin = content.get_bounding_client_rect();
        Some(Self {
            document,
            origin_x: origin.left(),
            origin_y: origin.top(),
        })
    }
}

#[cfg(not(feature = "ssr"))]
impl MeasurementProvider for DomMeasurement {
    fn measure(&self, element: &ElementRef) -> Option<BoundingBox> {
        let node = self.document.query_selector(&selector(element)).ok()??;
        let rect = node.get_bounding_client_rect();
        if rect.width() == 0.0 && rect.height() == 0.0 {
            return None;
        }
        Some(BoundingBox::new(
            rect.left() - self.origin_x,
            rect.top() - self.origin_y,
            rect.width(),
            rect.height(),
        ))
    }
}
