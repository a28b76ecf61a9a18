//! CLI command implementations.

pub mod compare;
pub mod search;

pub use compare::CompareCommand;
pub use search::SearchCommand;
