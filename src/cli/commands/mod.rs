//! CLI command implementations

pub mod completions;
pub mod methods;
pub mod negotiate;
pub mod sample;
pub mod simulate;
