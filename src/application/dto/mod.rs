//! Data Transfer Objects - The host-facing contract
//!
//! Everything the host sends in or receives back is defined here so the
//! infrastructure can serialize it without the domain knowing the wire format.

pub mod actions;
pub mod aspects;
pub mod module_config;
pub mod operations;
pub mod result;
pub mod snapshot;

pub use actions::{ActionMap, AppAction};
pub use aspects::{AspectPermission, AspectPermissions};
pub use module_config::{
    ColorScheme, ConfigValidationError, ModuleConfig, NarrativeComplexity, ResultType,
};
pub use operations::{HostOperation, ModuleOperation};
pub use result::{DetailsForParent, ResultData, ResultPayload, GAME_TYPE};
pub use snapshot::{HotspotState, HotspotView, Progress, RoomSummary, SessionSnapshot, TimerLevel};
