//! Recent-activity feed with ages kept as numbers.

use serde::Serialize;

use fleetpulse_core::sim::MetricSnapshot;
use fleetpulse_core::view::{ChangeRecord, DisplaySync, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub id: u64,
    pub text: String,
    pub minutes_ago: u32,
}

impl ActivityEntry {
    fn key(&self) -> String {
        format!("activity.{}", self.id)
    }
}

pub fn format_age(minutes: u32) -> String {
    match minutes {
        0 => "just now".to_string(),
        1 => "1 minute ago".to_string(),
        n => format!("{n} minutes ago"),
    }
}

/// Newest entry first, at most `limit` entries. Rendered keys are
/// `activity.<id>`.
#[derive(Debug)]
pub struct ActivityFeed {
    entries: Vec<ActivityEntry>,
    display: DisplaySync,
    limit: usize,
    removed: Vec<String>,
    next_id: u64,
}

impl ActivityFeed {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            display: DisplaySync::new(),
            limit: limit.max(1),
            removed: Vec::new(),
            next_id: 0,
        }
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Add an entry that happened `minutes_ago`. It goes before every entry of
    /// the same age or older; the oldest entries beyond the limit are evicted.
    pub fn record(&mut self, text: impl Into<String>, minutes_ago: u32) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        let entry = ActivityEntry {
            id,
            text: text.into(),
            minutes_ago,
        };
        self.display
            .configure_format(entry.key(), Formatter::new(|v| format_age(v as u32)));
        let pos = self
            .entries
            .iter()
            .position(|e| e.minutes_ago >= minutes_ago)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        while self.entries.len() > self.limit {
            let Some(evicted) = self.entries.pop() else {
                break;
            };
            let key = evicted.key();
            // unrendered entries are unknown to the view
            if self.display.forget(&key) {
                self.removed.push(key);
            }
        }
        id
    }

    /// Age every entry and return the text that changed.
    pub fn age(&mut self, minutes: u32) -> Vec<ChangeRecord> {
        for e in &mut self.entries {
            e.minutes_ago = e.minutes_ago.saturating_add(minutes);
        }
        self.render()
    }

    /// Render current ages (first call reports every entry).
    pub fn render(&mut self) -> Vec<ChangeRecord> {
        let snapshot = MetricSnapshot::from_pairs(
            0,
            self.entries
                .iter()
                .map(|e| (e.key(), f64::from(e.minutes_ago))),
        );
        self.display.render(&snapshot)
    }

    /// Keys of shown entries evicted since the last call.
    pub fn take_removed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.removed)
    }

    /// Restore state for a frame that never reached the view.
    pub fn rollback(&mut self, changes: &[ChangeRecord], mut removed: Vec<String>) {
        self.display.rollback(changes);
        removed.append(&mut self.removed);
        self.removed = removed;
    }
}
