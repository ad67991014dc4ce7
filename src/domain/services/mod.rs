//! Domain services - Pure rules that span several entities

pub mod completion;
pub mod scoring;

pub use completion::{evaluate_discovery, CompletionReport, SessionTally};
pub use scoring::calculate_score;
