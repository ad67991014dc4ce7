//! Completion rules - when a case counts as solved and how the result is summarised

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::calculate_score;
use crate::domain::entities::{Clue, Room};
use crate::domain::value_objects::{CompletionType, OutcomeStatus};

/// Share of critical clues needed for a partial solve (rounded up)
pub const PARTIAL_CRITICAL_RATIO: f64 = 0.8;
/// Share of all objects that must be found for a partial solve
pub const PARTIAL_DISCOVERY_RATIO: f64 = 0.7;
/// Share of critical clues at which the suspect counts as identified
pub const SUSPECT_IDENTIFIED_RATIO: f64 = 0.8;

/// Decide whether a fresh discovery ends the case.
///
/// The critical threshold is `ceil(total * 0.8)` while the discovery threshold
/// is a plain `found >= total * 0.7` comparison; the asymmetry is intended.
/// A room with no critical clues is solved perfectly on the first find.
pub fn evaluate_discovery(
    room: &Room,
    critical_found: usize,
    discovered_count: usize,
) -> Option<(CompletionType, OutcomeStatus)> {
    let critical_total = room.critical_clue_count();

    if critical_found >= critical_total {
        return Some((CompletionType::Solved, OutcomeStatus::Perfect));
    }

    let critical_needed = (critical_total as f64 * PARTIAL_CRITICAL_RATIO).ceil() as usize;
    let enough_found =
        discovered_count as f64 >= room.object_count() as f64 * PARTIAL_DISCOVERY_RATIO;

    if critical_found >= critical_needed && enough_found {
        return Some((CompletionType::Solved, OutcomeStatus::Complete));
    }

    None
}

/// Discoveries per click; a player who never clicked scores 1.0
pub fn accuracy(discovered_count: usize, total_clicks: u32) -> f64 {
    if total_clicks == 0 {
        return 1.0;
    }
    discovered_count as f64 / f64::from(total_clicks)
}

pub fn suspect_identified(critical_found: usize, critical_total: usize) -> bool {
    critical_found as f64 >= critical_total as f64 * SUSPECT_IDENTIFIED_RATIO
}

/// Percentage of critical clues found, 0 for rooms without critical clues
pub fn confidence_level(critical_found: usize, critical_total: usize) -> u8 {
    if critical_total == 0 {
        return 0;
    }
    let percent = (critical_found as f64 / critical_total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Everything the completion handler computes about a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub completion_type: CompletionType,
    pub outcome: OutcomeStatus,
    pub score: i64,
    pub accuracy: f64,
    /// Wall-clock milliseconds since the session started
    pub completion_time_ms: i64,
    pub hints_used: u32,
    pub critical_clues_found: usize,
    pub total_critical_clues: usize,
    pub motive_established: bool,
}

/// Inputs for [`CompletionReport::compile`], borrowed from the session
pub struct SessionTally<'a> {
    pub discovered_clues: &'a [Clue],
    pub total_clicks: u32,
    pub started_at: DateTime<Utc>,
    pub max_hints: u32,
    pub hints_remaining: u32,
}

impl CompletionReport {
    pub fn compile(
        room: &Room,
        tally: SessionTally<'_>,
        completion_type: CompletionType,
        outcome: OutcomeStatus,
        now: DateTime<Utc>,
    ) -> Self {
        let critical_clues_found = tally.discovered_clues.iter().filter(|c| c.is_critical()).count();

        Self {
            completion_type,
            outcome,
            score: calculate_score(
                tally.discovered_clues,
                tally.started_at,
                tally.hints_remaining,
                now,
            ),
            accuracy: accuracy(tally.discovered_clues.len(), tally.total_clicks),
            completion_time_ms: (now - tally.started_at).num_milliseconds(),
            hints_used: tally.max_hints.saturating_sub(tally.hints_remaining),
            critical_clues_found,
            total_critical_clues: room.critical_clue_count(),
            motive_established: tally
                .discovered_clues
                .iter()
                .any(|c| c.evidence_type.establishes_motive()),
        }
    }

    pub fn suspect_identified(&self) -> bool {
        suspect_identified(self.critical_clues_found, self.total_critical_clues)
    }

    pub fn confidence_level(&self) -> u8 {
        confidence_level(self.critical_clues_found, self.total_critical_clues)
    }
}
