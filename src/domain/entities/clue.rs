//! Clue entity - Narrative evidence attached to a hidden object

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ClueId, ClueImportance, EvidenceType};

/// A piece of evidence the player uncovers by finding its object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub id: ClueId,
    pub title: String,
    pub short_description: String,
    pub full_narrative: String,
    pub evidence_type: EvidenceType,
    pub importance: ClueImportance,
    /// Other clues this one points at (may reference clues in other rooms)
    #[serde(default)]
    pub related_clues: Vec<ClueId>,
    #[serde(default)]
    pub multimedia: Option<ClueMedia>,
    /// In-story time, free text ("2024-01-15 17:30")
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Clue {
    pub fn new(
        id: impl Into<ClueId>,
        title: impl Into<String>,
        evidence_type: EvidenceType,
        importance: ClueImportance,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_description: String::new(),
            full_narrative: String::new(),
            evidence_type,
            importance,
            related_clues: Vec::new(),
            multimedia: None,
            timestamp: None,
            location: None,
        }
    }

    pub fn with_description(mut self, short: impl Into<String>, full: impl Into<String>) -> Self {
        self.short_description = short.into();
        self.full_narrative = full.into();
        self
    }

    pub fn with_related(mut self, clue_id: impl Into<ClueId>) -> Self {
        self.related_clues.push(clue_id.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn is_critical(&self) -> bool {
        self.importance.is_critical()
    }
}

/// Media references shown alongside a clue's narrative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClueMedia {
    pub image: Option<String>,
    pub audio: Option<String>,
    pub document: Option<String>,
    pub video: Option<String>,
}
