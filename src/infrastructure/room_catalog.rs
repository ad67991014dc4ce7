//! Room catalog - Built-in case data and JSON room files

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::application::ports::outbound::RoomCatalogPort;
use crate::domain::entities::{Character, Room, RoomValidationError};
use crate::domain::value_objects::RoomId;

const BUILTIN_ROOMS: &str = include_str!("../../assets/rooms.json");

/// Errors raised while loading a room catalog
#[derive(Debug, thiserror::Error)]
pub enum RoomLoadError {
    #[error("Failed to read room file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed room catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] RoomValidationError),

    #[error("Room {0} is defined more than once")]
    DuplicateRoom(RoomId),

    #[error("Alias {alias} points at unknown room {target}")]
    UnknownAliasTarget { alias: RoomId, target: RoomId },
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    rooms: Vec<Room>,
    #[serde(default)]
    aliases: HashMap<RoomId, RoomId>,
    #[serde(default)]
    characters: Vec<Character>,
}

/// Immutable in-memory room catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoomCatalog {
    rooms: HashMap<RoomId, Room>,
    characters: Vec<Character>,
}

impl InMemoryRoomCatalog {
    /// The rooms and characters shipped with the module
    pub fn builtin() -> Result<Self, RoomLoadError> {
        Self::from_json(BUILTIN_ROOMS)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RoomLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RoomLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), rooms = catalog.rooms.len(), "Loaded room catalog");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, RoomLoadError> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let mut rooms = HashMap::with_capacity(file.rooms.len() + file.aliases.len());
        for room in file.rooms {
            room.validate()?;
            if rooms.contains_key(&room.id) {
                return Err(RoomLoadError::DuplicateRoom(room.id));
            }
            rooms.insert(room.id.clone(), room);
        }

        for (alias, target) in file.aliases {
            let Some(room) = rooms.get(&target) else {
                return Err(RoomLoadError::UnknownAliasTarget { alias, target });
            };
            if rooms.contains_key(&alias) {
                return Err(RoomLoadError::DuplicateRoom(alias));
            }
            debug!(%alias, %target, "Registered room alias");
            let aliased = room.aliased(alias.clone());
            rooms.insert(alias, aliased);
        }

        Ok(Self {
            rooms,
            characters: file.characters,
        })
    }
}

impl RoomCatalogPort for InMemoryRoomCatalog {
    fn room(&self, id: &RoomId) -> Option<Room> {
        self.rooms.get(id).cloned()
    }

    fn characters(&self) -> Vec<Character> {
        self.characters.clone()
    }

    fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<_> = self.rooms.keys().cloned().collect();
        ids.sort();
        ids
    }
}
