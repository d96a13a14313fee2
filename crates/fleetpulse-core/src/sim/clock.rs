//! Periodic driver: advance the store, then fan the snapshot out.
//!
//! The clock never spawns anything. A host loop calls [`SimulationClock::poll`]
//! (or sleeps until [`SimulationClock::next_due_ms`]) on its own timeline.
//! A tick runs to completion before `poll` returns, and the next due time is
//! measured from that completion, so ticks cannot overlap and late ticks are
//! delayed rather than replayed in a burst.

use crate::error::{FleetPulseError, Result};
use crate::sim::delta::DeltaSource;
use crate::sim::snapshot::MetricSnapshot;
use crate::sim::store::MetricStore;
use crate::time::SharedTime;

/// Receives every published snapshot, in subscription order.
pub trait SnapshotConsumer: Send {
    fn on_snapshot(&mut self, snapshot: &MetricSnapshot);
}

impl<F> SnapshotConsumer for F
where
    F: FnMut(&MetricSnapshot) + Send,
{
    fn on_snapshot(&mut self, snapshot: &MetricSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by [`SimulationClock::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy)]
struct Schedule {
    period_ms: u64,
    next_due_ms: u64,
}

pub struct SimulationClock<D> {
    store: MetricStore<D>,
    time: SharedTime,
    consumers: Vec<(SubscriptionId, Box<dyn SnapshotConsumer>)>,
    schedule: Option<Schedule>,
    next_sub: u64,
}

impl<D: DeltaSource> SimulationClock<D> {
    pub fn new(store: MetricStore<D>, time: SharedTime) -> Self {
        Self {
            store,
            time,
            consumers: Vec::new(),
            schedule: None,
            next_sub: 1,
        }
    }

    /// Begin ticking every `period_ms`. The first tick is due one period from now.
    pub fn start(&mut self, period_ms: u64) -> Result<()> {
        if self.schedule.is_some() {
            return Err(FleetPulseError::AlreadyRunning);
        }
        if period_ms == 0 {
            return Err(FleetPulseError::BadConfig(
                "simulation period must be greater than 0".into(),
            ));
        }
        let next_due_ms = self.time.now_ms().saturating_add(period_ms);
        self.schedule = Some(Schedule {
            period_ms,
            next_due_ms,
        });
        tracing::info!(period_ms, metrics = self.store.len(), "simulation clock started");
        Ok(())
    }

    /// Halt ticking. Safe in any state.
    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            tracing::info!("simulation clock stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn period_ms(&self) -> Option<u64> {
        self.schedule.map(|s| s.period_ms)
    }

    /// Millisecond reading (of the shared time source) when the next tick is due.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.schedule.map(|s| s.next_due_ms)
    }

    pub fn subscribe(&mut self, consumer: impl SnapshotConsumer + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_sub);
        self.next_sub += 1;
        self.consumers.push((id, Box::new(consumer)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.consumers.len();
        self.consumers.retain(|(sid, _)| *sid != id);
        self.consumers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.consumers.len()
    }

    /// Run one tick if it is due. Returns the published snapshot.
    pub fn poll(&mut self) -> Option<MetricSnapshot> {
        let sched = self.schedule?;
        if self.time.now_ms() < sched.next_due_ms {
            return None;
        }
        let snapshot = self.tick();
        if let Some(s) = self.schedule.as_mut() {
            s.next_due_ms = self.time.now_ms().saturating_add(s.period_ms);
        }
        Some(snapshot)
    }

    /// Advance every metric and notify all consumers, regardless of schedule.
    pub fn tick(&mut self) -> MetricSnapshot {
        let snapshot = self.store.advance_all();
        tracing::debug!(
            seq = snapshot.seq(),
            metrics = snapshot.len(),
            consumers = self.consumers.len(),
            "tick"
        );
        for (_, consumer) in self.consumers.iter_mut() {
            consumer.on_snapshot(&snapshot);
        }
        snapshot
    }

    /// Notify consumers with current values without advancing (initial paint).
    pub fn publish_current(&mut self) -> MetricSnapshot {
        let snapshot = self.store.snapshot();
        for (_, consumer) in self.consumers.iter_mut() {
            consumer.on_snapshot(&snapshot);
        }
        snapshot
    }

    pub fn store(&self) -> &MetricStore<D> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MetricStore<D> {
        &mut self.store
    }
}
