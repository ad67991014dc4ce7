//! Value objects - Immutable objects defined by their attributes

mod evidence;
mod geometry;
mod ids;
mod outcome;

pub use evidence::{ClueImportance, Difficulty, EvidenceType};
pub use geometry::{ScenePoint, SceneSize, SCENE_EXTENT};
pub use ids::*;
pub use outcome::{CompletionType, OutcomeStatus, SessionStatus};
