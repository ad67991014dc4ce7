//! Application services - Use case implementations
//!
//! `InvestigationService` is the single controller for a module instance.
//! The other services are pure helpers it delegates to.

pub mod aspect_service;
pub mod investigation_service;
pub mod result_interpretation;

pub use aspect_service::AspectRegistry;
pub use investigation_service::{HandleError, InvestigationService};
pub use result_interpretation::{classify_outcome, interpret_result, ResultDispatchError};
