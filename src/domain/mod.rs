//! Domain layer - Core game rules with no I/O
//!
//! This layer contains:
//! - Value objects: identifiers, evidence classification, scene geometry
//! - Entities: Room, HiddenObject, Clue, Character
//! - Aggregates: the PlaySession state machine
//! - Domain services: completion rules and scoring

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;
