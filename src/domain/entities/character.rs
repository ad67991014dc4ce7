//! Character entity - People connected to the case

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, ClueId};

/// A person of interest. Reference data only; characters surface in the case
/// summary once one of their related clues has been found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub role: String,
    pub description: String,
    #[serde(default)]
    pub related_clues: Vec<ClueId>,
    /// 0-100
    #[serde(default)]
    pub suspicion_level: u8,
}

impl Character {
    /// True if any discovered clue is linked to this character
    pub fn is_implicated_by<'a>(&self, discovered: impl IntoIterator<Item = &'a ClueId>) -> bool {
        discovered
            .into_iter()
            .any(|clue| self.related_clues.contains(clue))
    }
}
