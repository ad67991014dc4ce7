//! Investigation Service - The controller for one module instance
//!
//! Owns the configuration, the resolved room, the play session and the host
//! action map. Events are applied through the session reducer; scheduling
//! effects are handed back to the caller, completion effects are turned into
//! a result payload and delivered through the host bridge exactly once.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::result_interpretation::{interpret_result, ResultDispatchError};
use super::AspectRegistry;
use crate::application::dto::{
    ActionMap, AspectPermissions, ConfigValidationError, HostOperation, ModuleConfig,
    ModuleOperation, ResultData, SessionSnapshot,
};
use crate::application::ports::outbound::{ClockPort, HostBridgePort, RoomCatalogPort};
use crate::domain::aggregates::{PlaySession, ScheduleCommand, SessionEffect, SessionEvent};
use crate::domain::entities::{Character, Room};
use crate::domain::services::CompletionReport;

/// A completed case could not be dispatched.
///
/// Carries the scheduling work the same event produced so the caller can
/// still tear down the session's timers.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct HandleError {
    pub source: ResultDispatchError,
    pub commands: Vec<ScheduleCommand>,
}

pub struct InvestigationService {
    catalog: Arc<dyn RoomCatalogPort>,
    bridge: Arc<dyn HostBridgePort>,
    clock: Arc<dyn ClockPort>,
    config: Option<ModuleConfig>,
    actions: Option<ActionMap>,
    aspects: AspectRegistry,
    title: String,
    room: Option<Room>,
    characters: Vec<Character>,
    session: Option<PlaySession>,
}

impl InvestigationService {
    pub fn new(
        catalog: Arc<dyn RoomCatalogPort>,
        bridge: Arc<dyn HostBridgePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            bridge,
            clock,
            config: None,
            actions: None,
            aspects: AspectRegistry::default(),
            title: String::new(),
            room: None,
            characters: Vec::new(),
            session: None,
        }
    }

    /// Host handshake: the action map and the aspects this module may touch
    #[instrument(skip(self, actions, permissions), fields(actions = actions.len()))]
    pub fn init(&mut self, actions: ActionMap, permissions: AspectPermissions) {
        info!(aspects = permissions.len(), "Module initialized by host");
        self.actions = Some(actions);
        self.aspects = AspectRegistry::new(permissions);
    }

    /// Create the play session for `config`.
    ///
    /// A second call is a no-op. If the room is unknown the session is created
    /// but stays loading; nothing is surfaced to the host.
    #[instrument(skip(self, config), fields(room_id = %config.room_id))]
    pub fn configure(
        &mut self,
        config: ModuleConfig,
    ) -> Result<Vec<ScheduleCommand>, ConfigValidationError> {
        if self.session.is_some() {
            debug!("Session already exists, ignoring configuration");
            return Ok(Vec::new());
        }
        config.validate()?;

        let now = self.clock.now();
        let mut session = PlaySession::new(now);
        self.title = config.game_title.clone();
        self.characters = self.catalog.characters();

        let effects = match self.catalog.room(&config.room_id) {
            Some(room) => {
                let effects = session.begin(config.session_settings(), now);
                info!(
                    session_id = %session.id(),
                    objects = room.object_count(),
                    critical = room.critical_clue_count(),
                    "Investigation started"
                );
                self.room = Some(room);
                effects
            }
            None => {
                warn!(session_id = %session.id(), "Room not found, session stays loading");
                Vec::new()
            }
        };

        self.session = Some(session);
        self.config = Some(config);
        Ok(schedule_commands(effects))
    }

    /// Apply one session event.
    ///
    /// Returns the scheduling work the caller must perform. Fails only when a
    /// completed case cannot be mapped to a host action; the error still
    /// carries that work.
    #[instrument(skip(self))]
    pub async fn handle(&mut self, event: SessionEvent) -> Result<Vec<ScheduleCommand>, HandleError> {
        let (Some(session), Some(room)) = (self.session.as_mut(), self.room.as_ref()) else {
            debug!("No active session, event dropped");
            return Ok(Vec::new());
        };

        let effects = session.apply(room, event, self.clock.now());
        debug!(status = ?session.status(), effects = effects.len(), "Event handled");

        let mut commands = Vec::new();
        let mut reports = Vec::new();
        for effect in effects {
            match effect {
                SessionEffect::Schedule(command) => commands.push(command),
                SessionEffect::Completed(report) => reports.push(report),
            }
        }

        for report in &reports {
            if let Err(source) = self.dispatch_result(report).await {
                return Err(HandleError { source, commands });
            }
        }
        Ok(commands)
    }

    async fn dispatch_result(&self, report: &CompletionReport) -> Result<(), ResultDispatchError> {
        info!(
            completion_type = ?report.completion_type,
            outcome = ?report.outcome,
            score = report.score,
            "Investigation finished"
        );

        let (Some(config), Some(actions)) = (self.config.as_ref(), self.actions.as_ref()) else {
            debug!("No host action map, result discarded");
            return Ok(());
        };

        let payload = interpret_result(
            &config.expected_result_type,
            ResultData::from_report(report),
            actions,
        )?;

        if let Err(e) = self.bridge.deliver_result(payload).await {
            error!(error = %e, "Failed to deliver result to host");
        }
        Ok(())
    }

    #[instrument(skip(self, operation), fields(kind = %operation.kind))]
    pub fn apply_operation(&mut self, operation: &HostOperation) {
        match ModuleOperation::from(operation) {
            ModuleOperation::SetTitle(title) => {
                debug!(%title, "Title updated");
                self.title = title;
            }
            ModuleOperation::Unknown(kind) => warn!(%kind, "Unknown operation type"),
        }
    }

    pub fn aspect_updated(&mut self, key: &str, value: Value) -> bool {
        self.aspects.apply_update(key, value)
    }

    /// Forward a module-initiated aspect change if the host granted write access
    #[instrument(skip(self, value))]
    pub async fn request_aspect_change(&self, key: &str, value: Value) {
        if !self.aspects.can_write(key) {
            info!(aspect = key, "Module does not have write permission for aspect");
            return;
        }
        if let Err(e) = self.bridge.request_aspect_change(key.to_string(), value).await {
            error!(error = %e, aspect = key, "Failed to request aspect change");
        }
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let session = self.session.as_ref()?;
        let hints_enabled = self.config.as_ref().is_some_and(|c| c.hints_enabled);
        Some(SessionSnapshot::capture(
            session,
            self.room.as_ref(),
            &self.title,
            hints_enabled,
            &self.characters,
        ))
    }

    pub async fn publish_snapshot(&self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        if let Err(e) = self.bridge.publish_snapshot(snapshot).await {
            error!(error = %e, "Failed to publish snapshot");
        }
    }

    pub async fn report_error(&self, message: String) {
        if let Err(e) = self.bridge.report_error(message).await {
            error!(error = %e, "Failed to report error to host");
        }
    }

    pub fn session(&self) -> Option<&PlaySession> {
        self.session.as_ref()
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn aspects(&self) -> &AspectRegistry {
        &self.aspects
    }
}

fn schedule_commands(effects: Vec<SessionEffect>) -> Vec<ScheduleCommand> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            SessionEffect::Schedule(command) => Some(command),
            SessionEffect::Completed(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use mockall::predicate::*;
    use serde_json::json;
    use std::sync::Mutex;

    use super::*;
    use crate::application::dto::{AppAction, AspectPermission, ResultPayload};
    use crate::application::ports::outbound::{MockClockPort, MockHostBridgePort, MockRoomCatalogPort};
    use crate::domain::entities::{Clue, HiddenObject};
    use crate::domain::value_objects::{
        ClueImportance, CompletionType, EvidenceType, ObjectId, OutcomeStatus, RoomId,
        SessionStatus,
    };

    /// Clock that can be moved forward between events
    struct StepClock(Mutex<DateTime<Utc>>);

    impl StepClock {
        fn at(start: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(start)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl ClockPort for StepClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T17:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn object(id: &str, importance: ClueImportance) -> HiddenObject {
        let evidence = if id == "ledger" { EvidenceType::Financial } else { EvidenceType::Physical };
        HiddenObject::new(id, id, Clue::new(format!("{id}_clue"), id, evidence, importance))
    }

    fn two_critical_room() -> Room {
        Room::new("study", "Study")
            .with_object(object("ledger", ClueImportance::Critical))
            .with_object(object("knife", ClueImportance::Critical))
            .with_object(object("coat", ClueImportance::Background))
    }

    fn catalog(room: Option<Room>) -> Arc<MockRoomCatalogPort> {
        let mut catalog = MockRoomCatalogPort::new();
        catalog.expect_room().returning(move |_| room.clone());
        catalog.expect_characters().returning(Vec::new);
        Arc::new(catalog)
    }

    fn all_actions() -> ActionMap {
        [
            AppAction::CaseSolvedPerfect,
            AppAction::CaseSolved,
            AppAction::CasePartiallyResolved,
            AppAction::CaseIncomplete,
            AppAction::TimeExpired,
        ]
        .into_iter()
        .map(|a| (a.as_str().to_string(), format!("uid-{a}")))
        .collect()
    }

    fn capture_results(bridge: &mut MockHostBridgePort) -> Arc<Mutex<Vec<ResultPayload>>> {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();
        bridge.expect_deliver_result().returning(move |payload| {
            sink.lock().unwrap().push(payload);
            Ok(())
        });
        delivered
    }

    fn service(
        room: Option<Room>,
        bridge: MockHostBridgePort,
        clock: Arc<StepClock>,
    ) -> InvestigationService {
        InvestigationService::new(catalog(room), Arc::new(bridge), clock)
    }

    #[tokio::test]
    async fn test_perfect_solve_delivers_single_result() {
        let mut bridge = MockHostBridgePort::new();
        let delivered = capture_results(&mut bridge);
        let clock = StepClock::at(start());
        let mut service = service(Some(two_critical_room()), bridge, clock.clone());

        service.init(all_actions(), AspectPermissions::new());
        let commands = service.configure(ModuleConfig::default()).unwrap();
        assert!(commands.is_empty());

        service.handle(SessionEvent::ObjectClicked("ledger".into())).await.unwrap();
        clock.advance(Duration::seconds(30));
        let commands = service.handle(SessionEvent::ObjectClicked("knife".into())).await.unwrap();
        assert!(commands.contains(&ScheduleCommand::StopTimer));

        // Further input after completion does nothing
        service.handle(SessionEvent::ObjectClicked("coat".into())).await.unwrap();

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        let payload = &delivered[0];
        assert_eq!(payload.actions, vec!["uid-case-solved-perfect".to_string()]);
        assert_eq!(payload.result_type.as_str(), "attempt");
        assert!(payload.data.completed);
        assert_eq!(payload.data.evidence_found, 2);
        assert_eq!(payload.data.total_evidence, 2);
        assert_eq!(payload.data.accuracy, 1.0);
        assert_eq!(payload.data.completion_time, 30_000);
        // 2000 base + (5000 - 300) time + 3 * 300 hints
        assert_eq!(payload.data.score, 7600);
        assert!(payload.data.details_for_parent.motive_established);
        assert_eq!(payload.data.details_for_parent.confidence_level, 100);
        assert_eq!(service.session().unwrap().status(), SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_timeout_delivers_time_expired() {
        let mut bridge = MockHostBridgePort::new();
        let delivered = capture_results(&mut bridge);
        let clock = StepClock::at(start());
        let mut service = service(Some(two_critical_room()), bridge, clock.clone());

        service.init(all_actions(), AspectPermissions::new());
        let config = ModuleConfig { timer_enabled: true, time_limit: 60, ..Default::default() };
        let commands = service.configure(config).unwrap();
        assert_eq!(commands, vec![ScheduleCommand::StartTimer]);

        service.handle(SessionEvent::ObjectClicked("ledger".into())).await.unwrap();
        for _ in 0..60 {
            clock.advance(Duration::seconds(1));
            service.handle(SessionEvent::TimerTicked).await.unwrap();
        }
        service.handle(SessionEvent::TimerTicked).await.unwrap();

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        let payload = &delivered[0];
        assert_eq!(payload.actions, vec!["uid-time-expired".to_string()]);
        assert!(!payload.data.completed);
        assert!(payload.data.details_for_parent.time_expired);
        assert_eq!(payload.data.evidence_found, 1);

        let session = service.session().unwrap();
        assert_eq!(session.status(), SessionStatus::Failed);
        assert_eq!(session.time_remaining(), Some(0));
        assert_eq!(session.report().unwrap().completion_type, CompletionType::Timeout);
    }

    #[tokio::test]
    async fn test_missing_action_fails_without_delivery() {
        let mut bridge = MockHostBridgePort::new();
        bridge.expect_deliver_result().times(0);
        let mut service = service(Some(two_critical_room()), bridge, StepClock::at(start()));

        service.init(ActionMap::new().with(AppAction::CaseSolved, "uid-solved"), AspectPermissions::new());
        service.configure(ModuleConfig::default()).unwrap();

        service.handle(SessionEvent::ObjectClicked("ledger".into())).await.unwrap();
        let err = service
            .handle(SessionEvent::ObjectClicked("knife".into()))
            .await
            .unwrap_err();

        assert_eq!(err.source, ResultDispatchError::MissingAction(AppAction::CaseSolvedPerfect));
        assert!(err.commands.contains(&ScheduleCommand::StopTimer));
    }

    #[tokio::test]
    async fn test_without_action_map_result_is_discarded() {
        let mut bridge = MockHostBridgePort::new();
        bridge.expect_deliver_result().times(0);
        let mut service = service(Some(two_critical_room()), bridge, StepClock::at(start()));

        service.configure(ModuleConfig::default()).unwrap();
        service.handle(SessionEvent::ObjectClicked("ledger".into())).await.unwrap();
        service.handle(SessionEvent::ObjectClicked("knife".into())).await.unwrap();

        let session = service.session().unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.report().unwrap().outcome, OutcomeStatus::Perfect);
    }

    #[tokio::test]
    async fn test_unknown_room_stalls_in_loading() {
        let mut bridge = MockHostBridgePort::new();
        bridge.expect_deliver_result().times(0);
        let mut service = service(None, bridge, StepClock::at(start()));

        let config = ModuleConfig { room_id: RoomId::new("nowhere"), ..Default::default() };
        assert!(service.configure(config).unwrap().is_empty());

        service.handle(SessionEvent::ObjectClicked("ledger".into())).await.unwrap();
        service.handle(SessionEvent::HintRequested).await.unwrap();

        let session = service.session().unwrap();
        assert_eq!(session.status(), SessionStatus::Loading);
        assert_eq!(session.total_clicks(), 0);
        assert!(service.room().is_none());
    }

    #[tokio::test]
    async fn test_configure_is_idempotent() {
        let mut service =
            service(Some(two_critical_room()), MockHostBridgePort::new(), StepClock::at(start()));

        let timed = ModuleConfig { timer_enabled: true, time_limit: 300, ..Default::default() };
        service.configure(timed).unwrap();
        let session_id = service.session().unwrap().id();

        let commands = service.configure(ModuleConfig::default()).unwrap();
        assert!(commands.is_empty());
        assert_eq!(service.session().unwrap().id(), session_id);
        assert_eq!(service.session().unwrap().time_remaining(), Some(300));
    }

    #[tokio::test]
    async fn test_invalid_config_creates_no_session() {
        let mut service =
            service(Some(two_critical_room()), MockHostBridgePort::new(), StepClock::at(start()));

        let config = ModuleConfig { max_hints: 42, ..Default::default() };
        assert_eq!(
            service.configure(config).unwrap_err(),
            ConfigValidationError::MaxHintsOutOfRange(42)
        );
        assert!(service.session().is_none());
        assert!(service.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_hint_request_schedules_expiry() {
        let mut service =
            service(Some(two_critical_room()), MockHostBridgePort::new(), StepClock::at(start()));
        service.configure(ModuleConfig::default()).unwrap();

        let commands = service.handle(SessionEvent::HintRequested).await.unwrap();
        assert_eq!(commands, vec![ScheduleCommand::ScheduleHintExpiry { hint_seq: 1 }]);

        let snapshot = service.snapshot().unwrap();
        assert_eq!(snapshot.active_hint, Some(ObjectId::new("ledger")));
        assert_eq!(snapshot.hints_remaining, 2);
    }

    #[tokio::test]
    async fn test_set_title_operation() {
        let mut service =
            service(Some(two_critical_room()), MockHostBridgePort::new(), StepClock::at(start()));
        service.configure(ModuleConfig::default()).unwrap();

        service.apply_operation(&HostOperation::new("set-title", json!({"title": "Cold Case"})));
        service.apply_operation(&HostOperation::new("spin", Value::Null));

        assert_eq!(service.title(), "Cold Case");
        assert_eq!(service.snapshot().unwrap().title, "Cold Case");
    }

    #[tokio::test]
    async fn test_aspect_change_requires_write_permission() {
        let mut bridge = MockHostBridgePort::new();
        bridge
            .expect_request_aspect_change()
            .with(eq("progress".to_string()), eq(json!(50)))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut service = service(Some(two_critical_room()), bridge, StepClock::at(start()));

        service.init(
            ActionMap::new(),
            AspectPermissions::from([
                ("progress".to_string(), AspectPermission::ReadWrite),
                ("theme".to_string(), AspectPermission::Read),
            ]),
        );

        service.request_aspect_change("progress", json!(50)).await;
        service.request_aspect_change("theme", json!("dark")).await;
        service.request_aspect_change("volume", json!(1)).await;

        assert!(service.aspect_updated("theme", json!("light")));
        assert!(!service.aspect_updated("volume", json!(2)));
        assert_eq!(service.aspects().value("theme"), Some(&json!("light")));
    }

    #[tokio::test]
    async fn test_give_up_reports_incomplete() {
        let mut bridge = MockHostBridgePort::new();
        let delivered = capture_results(&mut bridge);
        let mut service = service(Some(two_critical_room()), bridge, StepClock::at(start()));

        service.init(all_actions(), AspectPermissions::new());
        service.configure(ModuleConfig::default()).unwrap();
        service.handle(SessionEvent::Paused).await.unwrap();
        service.handle(SessionEvent::GaveUp).await.unwrap();

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].data.completed);
        assert_eq!(delivered[0].actions, vec!["uid-case-partially-resolved".to_string()]);
    }

    #[tokio::test]
    async fn test_publish_snapshot_forwards_view() {
        let mut bridge = MockHostBridgePort::new();
        bridge
            .expect_publish_snapshot()
            .withf(|snapshot| snapshot.status == SessionStatus::Playing && snapshot.hotspots.len() == 3)
            .times(1)
            .returning(|_| Ok(()));
        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).returning(start);
        let mut service = InvestigationService::new(
            catalog(Some(two_critical_room())),
            Arc::new(bridge),
            Arc::new(clock),
        );

        service.configure(ModuleConfig::default()).unwrap();
        service.publish_snapshot().await;
    }
}
