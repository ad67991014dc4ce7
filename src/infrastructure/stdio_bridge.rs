//! Newline-delimited JSON host bridge
//!
//! Outbound messages go through an unbounded channel to a writer task, so the
//! session loop never blocks on the host reading its output.

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::{HostMessage, ModuleMessage};
use super::runtime::RuntimeHandle;
use crate::application::dto::{ResultPayload, SessionSnapshot};
use crate::application::ports::outbound::{BridgeError, HostBridgePort};

#[derive(Debug, Clone)]
pub struct StdioHostBridge {
    sender: mpsc::UnboundedSender<ModuleMessage>,
}

impl StdioHostBridge {
    pub fn new(sender: mpsc::UnboundedSender<ModuleMessage>) -> Self {
        Self { sender }
    }

    pub fn send(&self, message: ModuleMessage) -> Result<(), BridgeError> {
        self.sender.send(message).map_err(|_| BridgeError::Closed)
    }
}

#[async_trait]
impl HostBridgePort for StdioHostBridge {
    async fn deliver_result(&self, payload: ResultPayload) -> Result<(), BridgeError> {
        self.send(ModuleMessage::Result { payload })
    }

    async fn request_aspect_change(&self, key: String, value: Value) -> Result<(), BridgeError> {
        self.send(ModuleMessage::AspectChange { key, value })
    }

    async fn publish_snapshot(&self, snapshot: SessionSnapshot) -> Result<(), BridgeError> {
        self.send(ModuleMessage::Snapshot {
            snapshot: Box::new(snapshot),
        })
    }

    async fn report_error(&self, message: String) -> Result<(), BridgeError> {
        self.send(ModuleMessage::Error {
            code: "MODULE_ERROR".to_string(),
            message,
        })
    }
}

/// Spawn the task that serializes outbound messages, one per line
pub fn spawn_writer<W>(mut writer: W, mut messages: mpsc::UnboundedReceiver<ModuleMessage>) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(message) = messages.recv().await {
            let line = match serde_json::to_string(&message) {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to encode module message: {}", e);
                    continue;
                }
            };
            let written = async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await
            };
            if let Err(e) = written.await {
                tracing::error!("Failed to write to host: {}", e);
                break;
            }
        }
    })
}

/// Forward host lines into the runtime until input ends or the runtime stops
pub async fn pump_host_messages<R>(reader: R, runtime: RuntimeHandle, bridge: StdioHostBridge)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!("Host input closed");
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read from host: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<HostMessage>(&line) {
            Ok(message) => {
                if runtime.send(message.into()).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse message: {}", e);
                let error = ModuleMessage::Error {
                    code: "PARSE_ERROR".to_string(),
                    message: format!("Invalid message format: {}", e),
                };
                if bridge.send(error).is_err() {
                    break;
                }
            }
        }
    }
}
