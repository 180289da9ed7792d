//! Core schema editing logic: data store, undo history, tool state machine and
//! connector routing. Nothing here touches the DOM.

mod config;
mod controller;
mod error;
mod history;
mod ids;
mod interaction;
mod router;
mod schema;
mod store;
#[cfg(test)]
mod tests;
mod validation;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use history::*;
pub use ids::*;
pub use interaction::*;
pub use router::*;
pub use schema::*;
pub use store::*;
pub use validation::*;
