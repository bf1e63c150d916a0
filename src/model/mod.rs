// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod color;
pub mod tag;

pub use color::{ResolvedColor, Theme};
pub use tag::{DELIMITER, TagPath};
