//! Host action vocabulary and the host-supplied action map

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Logical actions this module can ask the host to trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppAction {
    #[default]
    Done,
    CustomAction,
    CaseSolvedPerfect,
    CaseSolved,
    CasePartiallyResolved,
    CaseIncomplete,
    HintUsed,
    EvidenceDiscovered,
    TimeExpired,
}

impl AppAction {
    /// Key under which the host registers this action
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::CustomAction => "custom-action",
            Self::CaseSolvedPerfect => "case-solved-perfect",
            Self::CaseSolved => "case-solved",
            Self::CasePartiallyResolved => "case-partially-resolved",
            Self::CaseIncomplete => "case-incomplete",
            Self::HintUsed => "hint-used",
            Self::EvidenceDiscovered => "evidence-discovered",
            Self::TimeExpired => "time-expired",
        }
    }
}

impl std::fmt::Display for AppAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from logical action name to the opaque id the host understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionMap(HashMap<String, String>);

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: AppAction, uid: impl Into<String>) -> Self {
        self.0.insert(action.as_str().to_string(), uid.into());
        self
    }

    /// Host id registered for `action`, if any
    pub fn resolve(&self, action: AppAction) -> Option<&str> {
        self.0
            .get(action.as_str())
            .map(String::as_str)
            .filter(|uid| !uid.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ActionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
