//! Session lifecycle and outcome vocabulary

use serde::{Deserialize, Serialize};

/// Lifecycle state of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Loading,
    Playing,
    Paused,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Completed and failed sessions accept no further gameplay
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    Solved,
    Timeout,
    GaveUp,
    Failed,
}

/// How well the case was resolved.
///
/// Distinct from [`SessionStatus`]: a session that is `Completed` may have
/// any of these outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Perfect,
    Complete,
    Partial,
    Incomplete,
    Failed,
}
