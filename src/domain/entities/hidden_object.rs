//! Hidden object entity - A clickable hotspot in a room

use serde::{Deserialize, Serialize};

use super::Clue;
use crate::domain::value_objects::{Difficulty, ObjectId, ScenePoint, SceneSize};

/// An interactive object placed in a room, hiding exactly one clue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenObject {
    pub id: ObjectId,
    pub name: String,
    pub position: ScenePoint,
    pub size: SceneSize,
    pub clue: Clue,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl HiddenObject {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>, clue: Clue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: ScenePoint::new(0.0, 0.0),
            size: SceneSize::new(5.0, 5.0),
            clue,
            difficulty: Difficulty::default(),
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = ScenePoint::new(x, y);
        self
    }

    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = SceneSize::new(width, height);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn is_critical(&self) -> bool {
        self.clue.is_critical()
    }
}
