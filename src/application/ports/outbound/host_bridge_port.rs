//! Host bridge port - The module's outbound channel to its host
//!
//! The transport itself is out of scope for the engine; adapters decide how
//! messages reach the host (stdio in the harness, a mock in tests).

use async_trait::async_trait;
use serde_json::Value;

use crate::application::dto::{ResultPayload, SessionSnapshot};

/// Failures delivering a message to the host
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Host channel closed")]
    Closed,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostBridgePort: Send + Sync {
    /// Hand the final result to the host's result callback
    async fn deliver_result(&self, payload: ResultPayload) -> Result<(), BridgeError>;

    /// Ask the host to change a writable aspect
    async fn request_aspect_change(&self, key: String, value: Value) -> Result<(), BridgeError>;

    /// Push the current session view to the presentation layer
    async fn publish_snapshot(&self, snapshot: SessionSnapshot) -> Result<(), BridgeError>;

    /// Report a module-side problem (e.g. an invalid configuration)
    async fn report_error(&self, message: String) -> Result<(), BridgeError>;
}
