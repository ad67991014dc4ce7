//! Casefile Engine - Progression engine for hidden-object investigation modules
//!
//! A host configures the module, the player clicks hotspots and asks for
//! hints, and the engine decides when the case is solved, scores it and
//! reports a result back through the host's action map.

pub mod application;
pub mod domain;
pub mod infrastructure;
