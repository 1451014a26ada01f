pub mod solution;
pub mod types;
