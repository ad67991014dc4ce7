//! Room entity - The fixed puzzle definition for one investigation scene

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Clue, HiddenObject};
use crate::domain::value_objects::{ClueImportance, ObjectId, RoomId};

/// A room is read-only reference data: a background, a description and an
/// ordered list of hidden objects. Order matters for hint selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub background_image: String,
    pub description: String,
    pub objects: Vec<HiddenObject>,
    #[serde(default)]
    pub ambient_sound: Option<String>,
}

/// Reasons a room definition is rejected
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RoomValidationError {
    #[error("Room {room} defines object {object} more than once")]
    DuplicateObject { room: RoomId, object: ObjectId },

    #[error("Object {object} in room {room} lies outside the scene bounds")]
    OutOfBounds { room: RoomId, object: ObjectId },
}

impl Room {
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            background_image: String::new(),
            description: String::new(),
            objects: Vec::new(),
            ambient_sound: None,
        }
    }

    pub fn with_object(mut self, object: HiddenObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Look up an object by id
    pub fn find_object(&self, id: &ObjectId) -> Option<&HiddenObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of objects whose clue is critical
    pub fn critical_clue_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_critical()).count()
    }

    pub fn clues_by_importance(&self, importance: ClueImportance) -> Vec<&Clue> {
        self.objects
            .iter()
            .filter(|o| o.clue.importance == importance)
            .map(|o| &o.clue)
            .collect()
    }

    /// Copy of this room registered under another id
    pub fn aliased(&self, id: impl Into<RoomId>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Check structural invariants: unique object ids, hotspots inside the scene
    pub fn validate(&self) -> Result<(), RoomValidationError> {
        let mut seen = HashSet::new();
        for object in &self.objects {
            if !seen.insert(&object.id) {
                return Err(RoomValidationError::DuplicateObject {
                    room: self.id.clone(),
                    object: object.id.clone(),
                });
            }
            if !object.position.is_within_scene() || !object.size.is_within_scene() {
                return Err(RoomValidationError::OutOfBounds {
                    room: self.id.clone(),
                    object: object.id.clone(),
                });
            }
        }
        Ok(())
    }
}
