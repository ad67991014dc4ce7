//! Read-only session view for the presentation layer

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::PlaySession;
use crate::domain::entities::{Character, Clue, Room};
use crate::domain::services::CompletionReport;
use crate::domain::value_objects::{ObjectId, RoomId, ScenePoint, SceneSize, SessionId, SessionStatus};

pub const WARNING_THRESHOLD_SECS: u32 = 120;
pub const DANGER_THRESHOLD_SECS: u32 = 60;

/// Urgency band of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerLevel {
    Normal,
    Warning,
    Danger,
}

impl TimerLevel {
    pub fn from_remaining(seconds: u32) -> Self {
        if seconds < DANGER_THRESHOLD_SECS {
            Self::Danger
        } else if seconds < WARNING_THRESHOLD_SECS {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotspotState {
    Normal,
    Hinted,
    Found,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotView {
    pub id: ObjectId,
    pub name: String,
    pub position: ScenePoint,
    pub size: SceneSize,
    pub state: HotspotState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub background_image: String,
    pub description: String,
    pub ambient_sound: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub found: usize,
    pub total: usize,
    pub critical_found: usize,
    pub critical_total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub title: String,
    pub room: Option<RoomSummary>,
    pub hotspots: Vec<HotspotView>,
    pub time_remaining: Option<u32>,
    pub timer_level: Option<TimerLevel>,
    pub hints_remaining: u32,
    /// Whether the hint button should be offered
    pub hints_available: bool,
    pub active_hint: Option<ObjectId>,
    pub discovered_clues: Vec<Clue>,
    pub progress: Progress,
    pub total_clicks: u32,
    pub selected_clue: Option<Clue>,
    pub summary_visible: bool,
    pub implicated_characters: Vec<Character>,
    pub report: Option<CompletionReport>,
}

impl SessionSnapshot {
    pub fn capture(
        session: &PlaySession,
        room: Option<&Room>,
        title: &str,
        hints_enabled: bool,
        characters: &[Character],
    ) -> Self {
        let hotspots = room
            .map(|room| {
                room.objects
                    .iter()
                    .map(|object| HotspotView {
                        id: object.id.clone(),
                        name: object.name.clone(),
                        position: object.position,
                        size: object.size,
                        state: if session.is_discovered(&object.id) {
                            HotspotState::Found
                        } else if session.active_hint() == Some(&object.id) {
                            HotspotState::Hinted
                        } else {
                            HotspotState::Normal
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();

        let discovered_ids: Vec<_> = session.discovered_clues().iter().map(|c| &c.id).collect();
        let implicated_characters = characters
            .iter()
            .filter(|c| c.is_implicated_by(discovered_ids.iter().copied()))
            .cloned()
            .collect();

        Self {
            session_id: session.id(),
            status: session.status(),
            title: title.to_string(),
            room: room.map(|room| RoomSummary {
                id: room.id.clone(),
                name: room.name.clone(),
                background_image: room.background_image.clone(),
                description: room.description.clone(),
                ambient_sound: room.ambient_sound.clone(),
            }),
            hotspots,
            time_remaining: session.time_remaining(),
            timer_level: session.time_remaining().map(TimerLevel::from_remaining),
            hints_remaining: session.hints_remaining(),
            hints_available: hints_enabled
                && session.hints_remaining() > 0
                && session.status() == SessionStatus::Playing,
            active_hint: session.active_hint().cloned(),
            discovered_clues: session.discovered_clues().to_vec(),
            progress: Progress {
                found: session.discovered_objects().len(),
                total: room.map_or(0, Room::object_count),
                critical_found: session.critical_clues_found(),
                critical_total: room.map_or(0, Room::critical_clue_count),
            },
            total_clicks: session.total_clicks(),
            selected_clue: session.selected_clue().cloned(),
            summary_visible: session.summary_visible(),
            implicated_characters,
            report: session.report().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::aggregates::{SessionEvent, SessionSettings};
    use crate::domain::entities::HiddenObject;
    use crate::domain::value_objects::{CharacterId, ClueImportance, EvidenceType};

    fn room() -> Room {
        Room::new("study", "Study")
            .with_object(HiddenObject::new(
                "ledger",
                "Ledger",
                Clue::new("ledger_clue", "Ledger", EvidenceType::Financial, ClueImportance::Critical),
            ))
            .with_object(HiddenObject::new(
                "safe",
                "Safe",
                Clue::new("safe_clue", "Safe", EvidenceType::Physical, ClueImportance::Critical),
            ))
    }

    fn suspect() -> Character {
        Character {
            id: CharacterId::new("marcus_webb"),
            name: "Marcus Webb".to_string(),
            role: "Accountant".to_string(),
            description: String::new(),
            related_clues: vec!["ledger_clue".into()],
            suspicion_level: 85,
        }
    }

    #[test]
    fn test_timer_levels() {
        assert_eq!(TimerLevel::from_remaining(600), TimerLevel::Normal);
        assert_eq!(TimerLevel::from_remaining(120), TimerLevel::Normal);
        assert_eq!(TimerLevel::from_remaining(119), TimerLevel::Warning);
        assert_eq!(TimerLevel::from_remaining(59), TimerLevel::Danger);
    }

    #[test]
    fn test_loading_snapshot_without_room() {
        let session = PlaySession::new(Utc::now());
        let snapshot = SessionSnapshot::capture(&session, None, "Digital Detective", true, &[]);

        assert_eq!(snapshot.status, SessionStatus::Loading);
        assert!(snapshot.room.is_none());
        assert!(snapshot.hotspots.is_empty());
        assert!(!snapshot.hints_available);
        assert_eq!(snapshot.progress.total, 0);
    }

    #[test]
    fn test_snapshot_reflects_progress() {
        let room = room();
        let now = Utc::now();
        let mut session = PlaySession::new(now);
        session.begin(SessionSettings { max_hints: 2, time_limit: Some(100) }, now);
        session.apply(&room, SessionEvent::ObjectClicked("ledger".into()), now);
        session.apply(&room, SessionEvent::HintRequested, now);

        let snapshot = SessionSnapshot::capture(&session, Some(&room), "Case", true, &[suspect()]);

        assert_eq!(snapshot.hotspots[0].state, HotspotState::Found);
        assert_eq!(snapshot.hotspots[1].state, HotspotState::Hinted);
        assert_eq!(snapshot.timer_level, Some(TimerLevel::Warning));
        assert_eq!(
            snapshot.progress,
            Progress { found: 1, total: 2, critical_found: 1, critical_total: 2 }
        );
        assert_eq!(snapshot.implicated_characters.len(), 1);
        assert!(snapshot.hints_available);
    }

    #[test]
    fn test_hints_unavailable_when_disabled() {
        let room = room();
        let now = Utc::now();
        let mut session = PlaySession::new(now);
        session.begin(SessionSettings { max_hints: 3, time_limit: None }, now);

        let snapshot = SessionSnapshot::capture(&session, Some(&room), "Case", false, &[]);
        assert!(!snapshot.hints_available);
        assert_eq!(snapshot.timer_level, None);
    }
}
