//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Config: Harness configuration
//! - Room catalog: Built-in rooms and JSON room files
//! - Clock: System time
//! - Scheduler and runtime: The session event loop and its timers
//! - Stdio bridge: JSON-lines host channel

pub mod clock;
pub mod config;
pub mod messages;
pub mod room_catalog;
pub mod runtime;
pub mod scheduler;
pub mod stdio_bridge;
