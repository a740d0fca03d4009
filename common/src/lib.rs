pub mod engine;

pub use engine::in_memory::InMemoryEngine;
pub use engine::{Cursor, Engine, EngineError, EngineResult, Record, Scope};
