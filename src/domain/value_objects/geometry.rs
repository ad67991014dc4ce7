//! Scene geometry - positions and sizes as percentages of the scene bounds

use serde::{Deserialize, Serialize};

/// Upper bound of the percentage coordinate space
pub const SCENE_EXTENT: f32 = 100.0;

/// Top-left corner of a hotspot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePoint {
    pub x: f32,
    pub y: f32,
}

/// Width and height of a hotspot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    pub width: f32,
    pub height: f32,
}

impl ScenePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_within_scene(&self) -> bool {
        in_range(self.x) && in_range(self.y)
    }
}

impl SceneSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_within_scene(&self) -> bool {
        in_range(self.width) && in_range(self.height)
    }
}

fn in_range(value: f32) -> bool {
    (0.0..=SCENE_EXTENT).contains(&value)
}
