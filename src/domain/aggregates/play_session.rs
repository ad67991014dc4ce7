//! Play session aggregate - the progression state machine
//!
//! The session is a reducer: [`PlaySession::apply`] takes one event, mutates
//! the session and returns the side effects the caller must carry out
//! (timer and hint scheduling, result delivery). It never performs I/O or
//! reads the clock itself.

use chrono::{DateTime, Utc};

use crate::domain::entities::{Clue, Room};
use crate::domain::services::completion::{evaluate_discovery, CompletionReport, SessionTally};
use crate::domain::value_objects::{
    ClueId, CompletionType, ObjectId, OutcomeStatus, SessionId, SessionStatus,
};

/// Per-session rules taken from the module configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub max_hints: u32,
    /// Seconds on the clock, `None` when the timer is disabled
    pub time_limit: Option<u32>,
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ObjectClicked(ObjectId),
    HintRequested,
    TimerTicked,
    /// Deferred clear of the hint issued with this sequence number
    HintExpired { hint_seq: u64 },
    Paused,
    Resumed,
    GaveUp,
    /// Presentation-only: toggle the clue shown in the detail panel
    ClueSelected(ClueId),
}

/// Scheduling work requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleCommand {
    StartTimer,
    StopTimer,
    ScheduleHintExpiry { hint_seq: u64 },
    CancelHintExpiry,
}

/// Side effects produced by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    Schedule(ScheduleCommand),
    /// The case ended; the report must be delivered to the host once
    Completed(CompletionReport),
}

/// Mutable progress of one playthrough
#[derive(Debug, Clone)]
pub struct PlaySession {
    id: SessionId,
    status: SessionStatus,
    started_at: DateTime<Utc>,
    time_remaining: Option<u32>,
    max_hints: u32,
    hints_remaining: u32,
    active_hint: Option<ObjectId>,
    hint_seq: u64,
    discovered_objects: Vec<ObjectId>,
    discovered_clues: Vec<Clue>,
    total_clicks: u32,
    selected_clue: Option<ClueId>,
    summary_visible: bool,
    report: Option<CompletionReport>,
}

impl PlaySession {
    /// A session waiting for its room, in the `Loading` state
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            status: SessionStatus::Loading,
            started_at: now,
            time_remaining: None,
            max_hints: 0,
            hints_remaining: 0,
            active_hint: None,
            hint_seq: 0,
            discovered_objects: Vec::new(),
            discovered_clues: Vec::new(),
            total_clicks: 0,
            selected_clue: None,
            summary_visible: false,
            report: None,
        }
    }

    /// Start play once the room is resolved. No-op unless still loading.
    pub fn begin(&mut self, settings: SessionSettings, now: DateTime<Utc>) -> Vec<SessionEffect> {
        if self.status != SessionStatus::Loading {
            return Vec::new();
        }

        self.status = SessionStatus::Playing;
        self.started_at = now;
        self.max_hints = settings.max_hints;
        self.hints_remaining = settings.max_hints;
        self.time_remaining = settings.time_limit;

        if self.time_remaining.is_some() {
            vec![SessionEffect::Schedule(ScheduleCommand::StartTimer)]
        } else {
            Vec::new()
        }
    }

    /// Apply one event and return the resulting side effects
    pub fn apply(&mut self, room: &Room, event: SessionEvent, now: DateTime<Utc>) -> Vec<SessionEffect> {
        match event {
            SessionEvent::ObjectClicked(object_id) => self.discover(room, object_id, now),
            SessionEvent::HintRequested => self.request_hint(room),
            SessionEvent::TimerTicked => self.tick(room, now),
            SessionEvent::HintExpired { hint_seq } => self.expire_hint(hint_seq),
            SessionEvent::Paused => self.pause(),
            SessionEvent::Resumed => self.resume(),
            SessionEvent::GaveUp => self.give_up(room, now),
            SessionEvent::ClueSelected(clue_id) => {
                self.toggle_selection(clue_id);
                Vec::new()
            }
        }
    }

    fn discover(&mut self, room: &Room, object_id: ObjectId, now: DateTime<Utc>) -> Vec<SessionEffect> {
        if self.status != SessionStatus::Playing {
            return Vec::new();
        }

        // Every click counts toward accuracy, even misses and repeats
        self.total_clicks += 1;

        let Some(object) = room.find_object(&object_id) else {
            return Vec::new();
        };
        if self.discovered_objects.contains(&object_id) {
            return Vec::new();
        }

        self.discovered_objects.push(object_id.clone());
        self.discovered_clues.push(object.clue.clone());
        debug_assert!(self.discovered_objects.len() as u64 <= u64::from(self.total_clicks));

        let mut effects = Vec::new();
        if self.active_hint.as_ref() == Some(&object_id) {
            self.active_hint = None;
            effects.push(SessionEffect::Schedule(ScheduleCommand::CancelHintExpiry));
        }

        let critical_found = self.critical_clues_found();
        if let Some((completion_type, outcome)) =
            evaluate_discovery(room, critical_found, self.discovered_objects.len())
        {
            effects.extend(self.complete(room, completion_type, outcome, SessionStatus::Completed, now));
        }

        effects
    }

    fn request_hint(&mut self, room: &Room) -> Vec<SessionEffect> {
        if self.hints_remaining == 0 || self.status != SessionStatus::Playing {
            return Vec::new();
        }

        let undiscovered = room
            .objects
            .iter()
            .filter(|o| !self.discovered_objects.contains(&o.id));
        let target = undiscovered
            .clone()
            .find(|o| o.is_critical())
            .or_else(|| undiscovered.clone().next());

        let Some(target) = target else {
            return Vec::new();
        };

        self.hints_remaining -= 1;
        self.active_hint = Some(target.id.clone());
        self.hint_seq += 1;

        vec![SessionEffect::Schedule(ScheduleCommand::ScheduleHintExpiry {
            hint_seq: self.hint_seq,
        })]
    }

    fn expire_hint(&mut self, hint_seq: u64) -> Vec<SessionEffect> {
        // A newer hint or a discovery already superseded this one
        if hint_seq == self.hint_seq {
            self.active_hint = None;
        }
        Vec::new()
    }

    fn tick(&mut self, room: &Room, now: DateTime<Utc>) -> Vec<SessionEffect> {
        if self.status != SessionStatus::Playing {
            return Vec::new();
        }
        let Some(remaining) = self.time_remaining else {
            return Vec::new();
        };

        if remaining > 1 {
            self.time_remaining = Some(remaining - 1);
            return Vec::new();
        }

        self.time_remaining = Some(0);
        self.complete(
            room,
            CompletionType::Timeout,
            OutcomeStatus::Failed,
            SessionStatus::Failed,
            now,
        )
    }

    fn pause(&mut self) -> Vec<SessionEffect> {
        if self.status != SessionStatus::Playing {
            return Vec::new();
        }
        self.status = SessionStatus::Paused;
        vec![SessionEffect::Schedule(ScheduleCommand::StopTimer)]
    }

    fn resume(&mut self) -> Vec<SessionEffect> {
        if self.status != SessionStatus::Paused {
            return Vec::new();
        }
        self.status = SessionStatus::Playing;
        if self.time_remaining.is_some() {
            vec![SessionEffect::Schedule(ScheduleCommand::StartTimer)]
        } else {
            Vec::new()
        }
    }

    fn give_up(&mut self, room: &Room, now: DateTime<Utc>) -> Vec<SessionEffect> {
        if !matches!(self.status, SessionStatus::Playing | SessionStatus::Paused) {
            return Vec::new();
        }
        self.complete(
            room,
            CompletionType::GaveUp,
            OutcomeStatus::Incomplete,
            SessionStatus::Completed,
            now,
        )
    }

    fn toggle_selection(&mut self, clue_id: ClueId) {
        if self.selected_clue.as_ref() == Some(&clue_id) {
            self.selected_clue = None;
        } else if self.discovered_clues.iter().any(|c| c.id == clue_id) {
            self.selected_clue = Some(clue_id);
        }
    }

    /// Completion handler: score the session, end it, and emit the report
    fn complete(
        &mut self,
        room: &Room,
        completion_type: CompletionType,
        outcome: OutcomeStatus,
        terminal: SessionStatus,
        now: DateTime<Utc>,
    ) -> Vec<SessionEffect> {
        if self.status.is_terminal() {
            return Vec::new();
        }

        let report = CompletionReport::compile(
            room,
            SessionTally {
                discovered_clues: &self.discovered_clues,
                total_clicks: self.total_clicks,
                started_at: self.started_at,
                max_hints: self.max_hints,
                hints_remaining: self.hints_remaining,
            },
            completion_type,
            outcome,
            now,
        );

        self.status = terminal;
        self.summary_visible = true;
        self.active_hint = None;
        self.report = Some(report.clone());

        vec![
            SessionEffect::Schedule(ScheduleCommand::StopTimer),
            SessionEffect::Schedule(ScheduleCommand::CancelHintExpiry),
            SessionEffect::Completed(report),
        ]
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    pub fn max_hints(&self) -> u32 {
        self.max_hints
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn active_hint(&self) -> Option<&ObjectId> {
        self.active_hint.as_ref()
    }

    pub fn discovered_objects(&self) -> &[ObjectId] {
        &self.discovered_objects
    }

    pub fn is_discovered(&self, object_id: &ObjectId) -> bool {
        self.discovered_objects.contains(object_id)
    }

    pub fn discovered_clues(&self) -> &[Clue] {
        &self.discovered_clues
    }

    pub fn critical_clues_found(&self) -> usize {
        self.discovered_clues.iter().filter(|c| c.is_critical()).count()
    }

    pub fn total_clicks(&self) -> u32 {
        self.total_clicks
    }

    pub fn selected_clue(&self) -> Option<&Clue> {
        let id = self.selected_clue.as_ref()?;
        self.discovered_clues.iter().find(|c| &c.id == id)
    }

    pub fn summary_visible(&self) -> bool {
        self.summary_visible
    }

    pub fn report(&self) -> Option<&CompletionReport> {
        self.report.as_ref()
    }
}
