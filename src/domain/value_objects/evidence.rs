//! Evidence classification - what a clue is and how much it matters

use serde::{Deserialize, Serialize};

/// Category of a piece of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Document,
    Digital,
    Physical,
    Witness,
    Forensic,
    Surveillance,
    Financial,
    Communication,
}

impl EvidenceType {
    /// Financial evidence is what establishes a motive
    pub fn establishes_motive(&self) -> bool {
        matches!(self, Self::Financial)
    }
}

/// Importance tier of a clue.
///
/// Drives both the score weight of a discovery and the completion thresholds:
/// only critical clues count toward solving the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClueImportance {
    Critical,
    Supporting,
    Background,
    RedHerring,
}

impl ClueImportance {
    /// Points awarded (or deducted) for discovering a clue of this tier
    pub fn score_weight(&self) -> i64 {
        match self {
            Self::Critical => 1000,
            Self::Supporting => 500,
            Self::Background => 200,
            Self::RedHerring => -100,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// How hard an object is to spot in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}
