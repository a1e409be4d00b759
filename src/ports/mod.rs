//! Ports layer: Trait definitions for external capabilities.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (prediction service,
//! persistence substrate, timers).

mod prediction;
mod scheduler;
mod storage;

pub use prediction::{
    HealthStatus, PredictionError, PredictionRequest, PredictionResponse, Predictor,
};
pub use scheduler::{Scheduler, TaskHandle};
pub use storage::KeyValueStore;
