//! Aggregates - Cluster of domain objects treated as a single unit

pub mod play_session;

pub use play_session::{
    PlaySession, ScheduleCommand, SessionEffect, SessionEvent, SessionSettings,
};
