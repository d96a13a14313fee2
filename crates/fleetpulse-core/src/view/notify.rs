//! Toast-style notification sink.
//!
//! State machine: `Idle -> Visible -> Expiring -> Idle`. A new post from any
//! state replaces the current notification outright (preemption, no queue).
//! Timers are deadlines on the shared time source; the host calls
//! [`NotificationSink::poll`] when [`NotificationSink::next_deadline_ms`] passes.

use serde::Serialize;

use crate::time::SharedTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkState {
    Idle,
    Visible,
    Expiring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

/// Lifecycle transitions, for the view layer to animate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    Shown { notification: Notification },
    /// Replaced by a newer post before it finished; removed immediately.
    Preempted { id: u64 },
    /// Display time is over; exit animation begins.
    Expiring { id: u64 },
    Removed { id: u64 },
    Dismissed { id: u64 },
}

impl SinkEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SinkEvent::Shown { .. } => "shown",
            SinkEvent::Preempted { .. } => "preempted",
            SinkEvent::Expiring { .. } => "expiring",
            SinkEvent::Removed { .. } => "removed",
            SinkEvent::Dismissed { .. } => "dismissed",
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Visible { note: Notification, expires_at_ms: u64 },
    Expiring { note: Notification, removed_at_ms: u64 },
}

pub struct NotificationSink {
    time: SharedTime,
    exit_ms: u64,
    phase: Phase,
    next_id: u64,
}

impl NotificationSink {
    /// `exit_ms` is the fixed length of the `Expiring` state.
    pub fn new(time: SharedTime, exit_ms: u64) -> Self {
        Self {
            time,
            exit_ms,
            phase: Phase::Idle,
            next_id: 1,
        }
    }

    pub fn state(&self) -> SinkState {
        match self.phase {
            Phase::Idle => SinkState::Idle,
            Phase::Visible { .. } => SinkState::Visible,
            Phase::Expiring { .. } => SinkState::Expiring,
        }
    }

    /// The owned notification, if any (visible or expiring).
    pub fn current(&self) -> Option<&Notification> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Visible { note, .. } | Phase::Expiring { note, .. } => Some(note),
        }
    }

    /// Show a message now, preempting whatever is displayed.
    pub fn post(&mut self, message: impl Into<String>, duration_ms: u64) -> Vec<SinkEvent> {
        let mut events = Vec::with_capacity(2);
        if let Some(old) = self.current() {
            tracing::debug!(id = old.id, "notification preempted");
            events.push(SinkEvent::Preempted { id: old.id });
        }

        let now = self.time.now_ms();
        let note = Notification {
            id: self.next_id,
            message: message.into(),
            created_at_ms: now,
            duration_ms,
        };
        self.next_id += 1;
        tracing::debug!(id = note.id, message = %note.message, duration_ms, "notification shown");

        events.push(SinkEvent::Shown {
            notification: note.clone(),
        });
        self.phase = Phase::Visible {
            note,
            expires_at_ms: now.saturating_add(duration_ms),
        };
        events
    }

    /// Force `Idle` from any state. Never fails.
    pub fn dismiss(&mut self) -> Vec<SinkEvent> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => Vec::new(),
            Phase::Visible { note, .. } | Phase::Expiring { note, .. } => {
                tracing::debug!(id = note.id, "notification dismissed");
                vec![SinkEvent::Dismissed { id: note.id }]
            }
        }
    }

    /// Apply every transition whose deadline has passed.
    pub fn poll(&mut self) -> Vec<SinkEvent> {
        let now = self.time.now_ms();
        let mut events = Vec::new();
        loop {
            match std::mem::replace(&mut self.phase, Phase::Idle) {
                Phase::Visible { note, expires_at_ms } if now >= expires_at_ms => {
                    tracing::debug!(id = note.id, "notification expiring");
                    events.push(SinkEvent::Expiring { id: note.id });
                    self.phase = Phase::Expiring {
                        note,
                        removed_at_ms: expires_at_ms.saturating_add(self.exit_ms),
                    };
                }
                Phase::Expiring { note, removed_at_ms } if now >= removed_at_ms => {
                    tracing::debug!(id = note.id, "notification removed");
                    events.push(SinkEvent::Removed { id: note.id });
                }
                other => {
                    self.phase = other;
                    break;
                }
            }
        }
        events
    }

    /// When the next transition is due, if one is pending.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match self.phase {
            Phase::Idle => None,
            Phase::Visible { expires_at_ms, .. } => Some(expires_at_ms),
            Phase::Expiring { removed_at_ms, .. } => Some(removed_at_ms),
        }
    }
}
