//! Ports - Interfaces the application needs from the outside world

pub mod outbound;
