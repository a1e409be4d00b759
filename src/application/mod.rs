//! Application layer: Use cases orchestrating domain and ports.
//!
//! - `scoring`: remote prediction with deterministic rule-based fallback
//! - `history`: per-identity assessment history with soft delete and undo

mod history;
mod scoring;

pub use history::{
    HistoryEntry, HistoryFilter, HistoryPage, HistoryService, PAGE_SIZE, UNDO_WINDOW,
};
pub use scoring::{AssessmentOutcome, ScoreSource, ScoringService};
