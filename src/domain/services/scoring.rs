//! Scoring - turns a finished investigation into a single number

use chrono::{DateTime, Utc};

use crate::domain::entities::Clue;

/// Time bonus at zero elapsed seconds
pub const MAX_TIME_BONUS: f64 = 5000.0;
/// Time bonus lost per elapsed second
pub const TIME_PENALTY_PER_SECOND: f64 = 10.0;
/// Points for every hint left unused
pub const UNUSED_HINT_BONUS: i64 = 300;

/// Sum of importance weights over the discovered clues
pub fn base_score(clues: &[Clue]) -> i64 {
    clues.iter().map(|c| c.importance.score_weight()).sum()
}

/// `max(0, 5000 - elapsed_seconds * 10)`, with fractional seconds
pub fn time_bonus(started_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed_seconds = (now - started_at).num_milliseconds() as f64 / 1000.0;
    (MAX_TIME_BONUS - elapsed_seconds * TIME_PENALTY_PER_SECOND).max(0.0)
}

pub fn hint_bonus(hints_remaining: u32) -> i64 {
    i64::from(hints_remaining) * UNUSED_HINT_BONUS
}

/// Final score for a session. Not clamped: a run made of red herrings can go
/// negative.
pub fn calculate_score(
    clues: &[Clue],
    started_at: DateTime<Utc>,
    hints_remaining: u32,
    now: DateTime<Utc>,
) -> i64 {
    let total = base_score(clues) as f64
        + time_bonus(started_at, now)
        + hint_bonus(hints_remaining) as f64;
    total.round() as i64
}
