pub mod canvas;
pub mod column_editor;
pub mod common;
pub mod connector;
pub mod icon;
pub mod measure;
pub mod prompt;
pub mod table;
pub mod table_editor;
pub mod toolbar;

pub use canvas::SchemaCanvas;
pub use icon::{Icon, icons};
