//! boardkit-engine: storage and orchestration for the board content engine
//!
//! Wires the domain logic from `boardkit-core` to a SQLite record store
//! and a filesystem blob store, one `BoardService` per board kind.

pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod ingest;

pub use board::BoardService;
pub use config::EngineConfig;
pub use db::Database;
pub use error::{EngineError, EngineResult};
pub use files::FileStore;
