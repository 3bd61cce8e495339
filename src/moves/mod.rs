pub mod action;
pub mod execute;
pub mod movegen;

pub use action::{Action, ActionFields};
pub use execute::{apply, generate_legal, in_check};
