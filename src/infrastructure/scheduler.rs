//! Cancellable timers feeding the session runtime
//!
//! Every scheduled event carries the session id it was scheduled for. Ticks
//! also carry a timer epoch, bumped on each start, so a tick queued by a timer
//! that has since been stopped is recognised and dropped.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::runtime::RuntimeEvent;
use crate::domain::aggregates::ScheduleCommand;
use crate::domain::value_objects::SessionId;

pub struct SessionScheduler {
    events: WeakUnboundedSender<RuntimeEvent>,
    tick_interval: Duration,
    hint_duration: Duration,
    session_id: Option<SessionId>,
    timer_epoch: u64,
    ticker: Option<JoinHandle<()>>,
    hint_expiry: Option<JoinHandle<()>>,
}

impl SessionScheduler {
    pub fn new(
        events: WeakUnboundedSender<RuntimeEvent>,
        tick_interval: Duration,
        hint_duration: Duration,
    ) -> Self {
        Self {
            events,
            tick_interval,
            hint_duration,
            session_id: None,
            timer_epoch: 0,
            ticker: None,
            hint_expiry: None,
        }
    }

    /// Attach to a session. Rebinding to a different session drops all timers.
    pub fn bind(&mut self, session_id: SessionId) {
        if self.session_id == Some(session_id) {
            return;
        }
        self.shutdown();
        self.session_id = Some(session_id);
    }

    pub fn apply(&mut self, command: ScheduleCommand) {
        match command {
            ScheduleCommand::StartTimer => self.start_timer(),
            ScheduleCommand::StopTimer => self.stop_timer(),
            ScheduleCommand::ScheduleHintExpiry { hint_seq } => self.schedule_hint_expiry(hint_seq),
            ScheduleCommand::CancelHintExpiry => self.cancel_hint_expiry(),
        }
    }

    pub fn is_current_session(&self, session_id: SessionId) -> bool {
        self.session_id == Some(session_id)
    }

    pub fn is_current_tick(&self, session_id: SessionId, epoch: u64) -> bool {
        self.is_current_session(session_id) && self.ticker.is_some() && epoch == self.timer_epoch
    }

    pub fn timer_running(&self) -> bool {
        self.ticker.is_some()
    }

    fn start_timer(&mut self) {
        let Some(session_id) = self.session_id else {
            return;
        };
        self.stop_timer();
        self.timer_epoch += 1;

        let epoch = self.timer_epoch;
        let period = self.tick_interval;
        let events = self.events.clone();
        debug!(%session_id, epoch, "Starting countdown");

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(events) = events.upgrade() else {
                    break;
                };
                if events.send(RuntimeEvent::TimerTick { session_id, epoch }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_timer(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn schedule_hint_expiry(&mut self, hint_seq: u64) {
        let Some(session_id) = self.session_id else {
            return;
        };
        self.cancel_hint_expiry();

        let delay = self.hint_duration;
        let events = self.events.clone();
        self.hint_expiry = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            if let Some(events) = events.upgrade() {
                let _ = events.send(RuntimeEvent::HintExpired { session_id, hint_seq });
            }
        }));
    }

    fn cancel_hint_expiry(&mut self) {
        if let Some(expiry) = self.hint_expiry.take() {
            expiry.abort();
        }
    }

    /// Abort every pending task
    pub fn shutdown(&mut self) {
        self.stop_timer();
        self.cancel_hint_expiry();
    }
}

impl Drop for SessionScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn scheduler() -> (SessionScheduler, mpsc::UnboundedSender<RuntimeEvent>, mpsc::UnboundedReceiver<RuntimeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = SessionScheduler::new(
            tx.downgrade(),
            Duration::from_secs(1),
            Duration::from_secs(5),
        );
        (scheduler, tx, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_carry_session_and_epoch() {
        let (mut scheduler, _tx, mut rx) = scheduler();
        let session_id = SessionId::new();
        scheduler.bind(session_id);

        let started = Instant::now();
        scheduler.apply(ScheduleCommand::StartTimer);

        let Some(RuntimeEvent::TimerTick { session_id: tick_session, epoch }) = rx.recv().await else {
            panic!("expected a tick");
        };
        assert_eq!(tick_session, session_id);
        assert_eq!(epoch, 1);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(scheduler.is_current_tick(session_id, epoch));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_invalidates_old_ticks() {
        let (mut scheduler, _tx, mut rx) = scheduler();
        let session_id = SessionId::new();
        scheduler.bind(session_id);

        scheduler.apply(ScheduleCommand::StartTimer);
        scheduler.apply(ScheduleCommand::StopTimer);
        assert!(!scheduler.is_current_tick(session_id, 1));

        scheduler.apply(ScheduleCommand::StartTimer);
        let Some(RuntimeEvent::TimerTick { epoch, .. }) = rx.recv().await else {
            panic!("expected a tick");
        };
        assert_eq!(epoch, 2);
        assert!(!scheduler.is_current_tick(session_id, 1));
        assert!(!scheduler.is_current_tick(SessionId::new(), 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hint_expiry_fires_after_duration() {
        let (mut scheduler, _tx, mut rx) = scheduler();
        let session_id = SessionId::new();
        scheduler.bind(session_id);

        let started = Instant::now();
        scheduler.apply(ScheduleCommand::ScheduleHintExpiry { hint_seq: 1 });
        scheduler.apply(ScheduleCommand::ScheduleHintExpiry { hint_seq: 2 });

        let Some(RuntimeEvent::HintExpired { hint_seq, .. }) = rx.recv().await else {
            panic!("expected a hint expiry");
        };
        assert_eq!(hint_seq, 2);
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_expiry_never_fires() {
        let (mut scheduler, _tx, mut rx) = scheduler();
        scheduler.bind(SessionId::new());

        scheduler.apply(ScheduleCommand::ScheduleHintExpiry { hint_seq: 1 });
        scheduler.apply(ScheduleCommand::CancelHintExpiry);

        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbound_scheduler_ignores_commands() {
        let (mut scheduler, _tx, _rx) = scheduler();
        scheduler.apply(ScheduleCommand::StartTimer);
        assert!(!scheduler.timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tasks_stop_when_channel_closes() {
        let (mut scheduler, tx, mut rx) = scheduler();
        scheduler.bind(SessionId::new());
        scheduler.apply(ScheduleCommand::StartTimer);

        drop(tx);
        time::sleep(Duration::from_secs(3)).await;
        assert!(rx.recv().await.is_none());
    }
}
