pub mod cache;
pub mod color_utils;
pub mod config;
pub mod engine;
pub mod generator;
pub mod model;
pub mod optimizer;
pub mod registry;
pub mod resolver;
pub mod storage;
pub mod stylesheet;

pub use config::Configuration;
pub use engine::Engine;
pub use model::{ResolvedColor, TagPath, Theme};
pub use registry::TagRegistry;
pub use storage::{FileStore, MemoryStore, PersistedState, StateStore};
