//! Shared dialog, message and hint components

pub mod keyboard;
pub mod message;
pub mod modal;

pub use keyboard::{KeyboardHint, KeyboardHints, canvas_shortcuts};
pub use message::ErrorMessage;
pub use modal::{BaseModal, ConfirmDialog, NameDialog};
