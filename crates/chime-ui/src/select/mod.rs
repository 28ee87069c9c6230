//! Selections and confirmations.

mod choice;
mod confirm;
mod selector;

pub use choice::Choice;
pub use confirm::{Confirmation, DEFAULT_CONFIRM_EMOJIS, confirm};
pub use selector::{Selector, select};
