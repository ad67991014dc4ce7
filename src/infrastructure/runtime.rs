//! Session runtime - The single consumer that owns the investigation
//!
//! Host input, timer ticks and hint expiries all arrive on one unbounded
//! channel and are handled strictly one at a time, result delivery included.
//! No lock guards session state.

use std::ops::ControlFlow;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::scheduler::SessionScheduler;
use crate::application::dto::{ActionMap, AspectPermissions, HostOperation, ModuleConfig};
use crate::application::services::{InvestigationService, ResultDispatchError};
use crate::domain::aggregates::{ScheduleCommand, SessionEvent};
use crate::domain::value_objects::SessionId;

/// Everything the runtime reacts to
#[derive(Debug)]
pub enum RuntimeEvent {
    Init {
        actions: ActionMap,
        aspects: AspectPermissions,
    },
    Configure(Box<ModuleConfig>),
    /// Player input
    Session(SessionEvent),
    TimerTick {
        session_id: SessionId,
        epoch: u64,
    },
    HintExpired {
        session_id: SessionId,
        hint_seq: u64,
    },
    Operation(HostOperation),
    AspectUpdate {
        key: String,
        value: Value,
    },
    AspectChangeRequested {
        key: String,
        value: Value,
    },
    SnapshotRequested,
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
#[error("Session runtime has stopped")]
pub struct RuntimeStopped;

/// Cloneable sender into a running [`SessionRuntime`]. The runtime stops once
/// every handle is dropped.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    sender: mpsc::UnboundedSender<RuntimeEvent>,
}

impl RuntimeHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RuntimeEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, event: RuntimeEvent) -> Result<(), RuntimeStopped> {
        self.sender.send(event).map_err(|_| RuntimeStopped)
    }
}

pub struct SessionRuntime {
    service: InvestigationService,
    scheduler: SessionScheduler,
    events: mpsc::UnboundedReceiver<RuntimeEvent>,
}

impl SessionRuntime {
    pub fn new(
        service: InvestigationService,
        tick_interval: Duration,
        hint_duration: Duration,
    ) -> (Self, RuntimeHandle) {
        let (handle, events) = RuntimeHandle::channel();
        let scheduler =
            SessionScheduler::new(handle.sender.downgrade(), tick_interval, hint_duration);
        let runtime = Self {
            service,
            scheduler,
            events,
        };
        (runtime, handle)
    }

    /// Process events until shutdown, until every handle is gone, or until a
    /// result cannot be dispatched
    pub async fn run(mut self) -> Result<(), ResultDispatchError> {
        info!("Session runtime started");

        while let Some(event) = self.events.recv().await {
            match self.process(event).await {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(e) => {
                    error!(error = %e, "Result dispatch failed");
                    self.scheduler.shutdown();
                    return Err(e);
                }
            }
        }

        self.scheduler.shutdown();
        info!("Session runtime stopped");
        Ok(())
    }

    async fn process(&mut self, event: RuntimeEvent) -> Result<ControlFlow<()>, ResultDispatchError> {
        match event {
            RuntimeEvent::Init { actions, aspects } => self.service.init(actions, aspects),
            RuntimeEvent::Configure(config) => self.configure(*config).await,
            RuntimeEvent::Session(event) => self.dispatch(event).await?,
            RuntimeEvent::TimerTick { session_id, epoch } => {
                if self.scheduler.is_current_tick(session_id, epoch) {
                    self.dispatch(SessionEvent::TimerTicked).await?;
                } else {
                    debug!(%session_id, epoch, "Dropped stale timer tick");
                }
            }
            RuntimeEvent::HintExpired { session_id, hint_seq } => {
                if self.scheduler.is_current_session(session_id) {
                    self.dispatch(SessionEvent::HintExpired { hint_seq }).await?;
                } else {
                    debug!(%session_id, "Dropped hint expiry for another session");
                }
            }
            RuntimeEvent::Operation(operation) => {
                self.service.apply_operation(&operation);
                self.service.publish_snapshot().await;
            }
            RuntimeEvent::AspectUpdate { key, value } => {
                self.service.aspect_updated(&key, value);
            }
            RuntimeEvent::AspectChangeRequested { key, value } => {
                self.service.request_aspect_change(&key, value).await;
            }
            RuntimeEvent::SnapshotRequested => self.service.publish_snapshot().await,
            RuntimeEvent::Shutdown => {
                info!("Shutdown requested");
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    async fn configure(&mut self, config: ModuleConfig) {
        match self.service.configure(config) {
            Ok(commands) => {
                if let Some(session) = self.service.session() {
                    self.scheduler.bind(session.id());
                }
                self.schedule(commands);
                self.service.publish_snapshot().await;
            }
            Err(e) => {
                warn!(error = %e, "Rejected module configuration");
                self.service.report_error(e.to_string()).await;
            }
        }
    }

    async fn dispatch(&mut self, event: SessionEvent) -> Result<(), ResultDispatchError> {
        let commands = match self.service.handle(event).await {
            Ok(commands) => commands,
            Err(e) => {
                self.schedule(e.commands);
                return Err(e.source);
            }
        };
        self.schedule(commands);
        self.service.publish_snapshot().await;
        Ok(())
    }

    fn schedule(&mut self, commands: Vec<ScheduleCommand>) {
        for command in commands {
            self.scheduler.apply(command);
        }
    }
}
