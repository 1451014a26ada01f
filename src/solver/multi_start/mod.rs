pub mod construction;
pub mod or_opt;
pub mod relocate;
pub mod search;
pub mod two_opt;

pub use search::{solve, SearchOutcome};
