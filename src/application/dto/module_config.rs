//! Module configuration supplied by the host

use serde::{Deserialize, Serialize};

use super::AppAction;
use crate::domain::aggregates::SessionSettings;
use crate::domain::value_objects::{Difficulty, RoomId};

pub const MAX_HINTS_LIMIT: u32 = 10;
pub const MIN_TIME_LIMIT_SECS: u32 = 60;
pub const MAX_TIME_LIMIT_SECS: u32 = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Classic,
    #[default]
    Neon,
    Monochrome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeComplexity {
    Simple,
    #[default]
    Detailed,
    Complex,
}

/// Result type tag owned by the host framework; echoed back untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultType(String);

impl ResultType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResultType {
    fn default() -> Self {
        Self("attempt".to_string())
    }
}

/// Errors raised when a configuration falls outside the accepted ranges
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Game title must not be empty")]
    EmptyTitle,

    #[error("maxHints must be between 0 and 10, got {0}")]
    MaxHintsOutOfRange(u32),

    #[error("timeLimit must be between 60 and 1800 seconds, got {0}")]
    TimeLimitOutOfRange(u32),
}

/// Host configuration for one module instance.
///
/// Presentation fields (`color_scheme`, `narrative_complexity`,
/// `sound_enabled`, `particle_effects`) and `difficulty` are passed through
/// without affecting the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleConfig {
    pub result_action: AppAction,
    pub game_title: String,
    pub room_id: RoomId,
    pub difficulty: Difficulty,
    pub hints_enabled: bool,
    pub max_hints: u32,
    pub timer_enabled: bool,
    /// Seconds
    pub time_limit: u32,
    pub color_scheme: ColorScheme,
    pub narrative_complexity: NarrativeComplexity,
    pub sound_enabled: bool,
    pub particle_effects: bool,
    pub expected_result_type: ResultType,
    pub replay_ability: String,
    pub integration_type: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            result_action: AppAction::Done,
            game_title: "Digital Detective".to_string(),
            room_id: RoomId::new("detective_apartment"),
            difficulty: Difficulty::Medium,
            hints_enabled: true,
            max_hints: 3,
            timer_enabled: false,
            time_limit: 600,
            color_scheme: ColorScheme::Neon,
            narrative_complexity: NarrativeComplexity::Detailed,
            sound_enabled: true,
            particle_effects: true,
            expected_result_type: ResultType::default(),
            replay_ability: "once".to_string(),
            integration_type: "standalone".to_string(),
        }
    }
}

impl ModuleConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.game_title.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTitle);
        }
        if self.max_hints > MAX_HINTS_LIMIT {
            return Err(ConfigValidationError::MaxHintsOutOfRange(self.max_hints));
        }
        if !(MIN_TIME_LIMIT_SECS..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit) {
            return Err(ConfigValidationError::TimeLimitOutOfRange(self.time_limit));
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            max_hints: self.max_hints,
            time_limit: self.timer_enabled.then_some(self.time_limit),
        }
    }
}
