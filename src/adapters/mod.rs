//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `http`: reqwest client for the remote prediction service
//! - `sqlite`: SQLite for durable local storage
//! - `memory`: volatile storage for tests and ephemeral sessions
//! - `timer`: tokio timers, plus a virtual-time scheduler for tests

pub mod http;
pub mod memory;
pub mod sqlite;
pub mod timer;

pub use http::HttpPredictor;
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StorageError};
pub use timer::{ManualScheduler, TokioScheduler};
