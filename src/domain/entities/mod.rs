//! Domain entities - Core business objects with identity

mod character;
mod clue;
mod hidden_object;
mod room;

pub use character::Character;
pub use clue::{Clue, ClueMedia};
pub use hidden_object::HiddenObject;
pub use room::{Room, RoomValidationError};
