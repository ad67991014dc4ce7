//! Room catalog port - Lookup of the read-only puzzle definitions

use crate::domain::entities::{Character, Room};
use crate::domain::value_objects::RoomId;

/// Source of rooms and case characters
#[cfg_attr(test, mockall::automock)]
pub trait RoomCatalogPort: Send + Sync {
    /// Resolve a room by id, `None` if the catalog does not know it
    fn room(&self, id: &RoomId) -> Option<Room>;

    /// People of interest for the case
    fn characters(&self) -> Vec<Character>;

    /// Ids of every known room, aliases included
    fn room_ids(&self) -> Vec<RoomId>;
}
