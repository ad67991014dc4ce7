//! Result payload delivered to the host when a case ends

use serde::{Deserialize, Serialize};

use super::ResultType;
use crate::domain::services::CompletionReport;
use crate::domain::value_objects::{CompletionType, OutcomeStatus};

pub const GAME_TYPE: &str = "hidden_object_investigation";

/// Envelope handed to the host's result callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub data: ResultData,
    /// Exactly one resolved host action id
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    pub game_type: String,
    /// False only when the outcome is `failed`
    pub completed: bool,
    pub score: i64,
    pub accuracy: f64,
    /// Milliseconds
    pub completion_time: i64,
    pub hints_used: u32,
    pub evidence_found: usize,
    pub total_evidence: usize,
    pub details_for_parent: DetailsForParent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsForParent {
    pub investigation_complete: bool,
    pub suspect_identified: bool,
    pub motive_established: bool,
    /// 0-100
    pub confidence_level: u8,
    pub time_expired: bool,
}

impl ResultData {
    pub fn from_report(report: &CompletionReport) -> Self {
        Self {
            game_type: GAME_TYPE.to_string(),
            completed: report.outcome != OutcomeStatus::Failed,
            score: report.score,
            accuracy: report.accuracy,
            completion_time: report.completion_time_ms,
            hints_used: report.hints_used,
            evidence_found: report.critical_clues_found,
            total_evidence: report.total_critical_clues,
            details_for_parent: DetailsForParent {
                investigation_complete: report.outcome == OutcomeStatus::Perfect,
                suspect_identified: report.suspect_identified(),
                motive_established: report.motive_established,
                confidence_level: report.confidence_level(),
                time_expired: report.completion_type == CompletionType::Timeout,
            },
        }
    }
}
