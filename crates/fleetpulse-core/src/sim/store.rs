//! Bounded random-walk metric store.
//!
//! The store is the only writer of metric values. Every mutation clamps into
//! `[min, max]`; an overshooting step lands exactly on the boundary.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{FleetPulseError, Result};
use crate::sim::delta::DeltaSource;
use crate::sim::snapshot::{MetricSnapshot, SnapshotEntry};

/// How a metric draws its delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// `delta = unit * max_step`.
    #[default]
    Continuous,
    /// Whole delta drawn uniformly from `[-floor(max_step), floor(max_step)]`, for counts.
    Discrete,
}

/// One named metric. Invariant: `min <= value <= max`, `max_step >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    name: String,
    value: f64,
    min: f64,
    max: f64,
    max_step: f64,
    kind: StepKind,
}

impl Metric {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        min: f64,
        max: f64,
        max_step: f64,
        kind: StepKind,
    ) -> Result<Self> {
        let name = name.into();
        let bad = !value.is_finite()
            || !min.is_finite()
            || !max.is_finite()
            || !max_step.is_finite()
            || min > max
            || value < min
            || value > max
            || max_step < 0.0;
        if bad {
            return Err(FleetPulseError::InvalidRange {
                name,
                value,
                min,
                max,
            });
        }
        Ok(Self {
            name,
            value,
            min,
            max,
            max_step,
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn value(&self) -> f64 {
        self.value
    }
    pub fn min(&self) -> f64 {
        self.min
    }
    pub fn max(&self) -> f64 {
        self.max
    }
    pub fn max_step(&self) -> f64 {
        self.max_step
    }
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    fn step<D: DeltaSource + ?Sized>(&mut self, deltas: &mut D) -> f64 {
        let delta = match self.kind {
            StepKind::Continuous => deltas.unit() * self.max_step,
            StepKind::Discrete => deltas.whole(self.max_step.floor() as u32) as f64,
        };
        let target = self.value + delta;
        let next = target.clamp(self.min, self.max);
        if next != target {
            tracing::trace!(metric = %self.name, unclamped = target, clamped = next, "step clamped at boundary");
        }
        self.value = next;
        next
    }
}

/// Owns every metric and the delta source that drives them.
pub struct MetricStore<D> {
    metrics: Vec<Metric>,
    index: HashMap<String, usize>,
    deltas: D,
    seq: u64,
}

impl<D: DeltaSource> MetricStore<D> {
    pub fn new(deltas: D) -> Self {
        Self {
            metrics: Vec::new(),
            index: HashMap::new(),
            deltas,
            seq: 0,
        }
    }

    /// Register a continuous metric.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        initial: f64,
        min: f64,
        max: f64,
        max_step: f64,
    ) -> Result<()> {
        self.insert(Metric::new(name, initial, min, max, max_step, StepKind::Continuous)?)
    }

    /// Register a pre-built metric (any step kind).
    pub fn insert(&mut self, metric: Metric) -> Result<()> {
        if self.index.contains_key(metric.name()) {
            return Err(FleetPulseError::DuplicateMetric(metric.name().to_string()));
        }
        tracing::debug!(
            metric = %metric.name(),
            value = metric.value(),
            min = metric.min(),
            max = metric.max(),
            max_step = metric.max_step(),
            "metric registered"
        );
        self.index.insert(metric.name().to_string(), self.metrics.len());
        self.metrics.push(metric);
        Ok(())
    }

    /// One bounded random step. Returns the new value.
    pub fn advance(&mut self, name: &str) -> Result<f64> {
        let idx = self.position(name)?;
        Ok(self.metrics[idx].step(&mut self.deltas))
    }

    /// Step every metric in registration order, then snapshot.
    pub fn advance_all(&mut self) -> MetricSnapshot {
        for m in &mut self.metrics {
            m.step(&mut self.deltas);
        }
        self.seq += 1;
        self.snapshot()
    }

    /// Current values, no mutation.
    pub fn snapshot(&self) -> MetricSnapshot {
        let entries = self
            .metrics
            .iter()
            .map(|m| SnapshotEntry {
                name: m.name.clone(),
                value: m.value,
            })
            .collect();
        MetricSnapshot::new(self.seq, entries)
    }

    pub fn get(&self, name: &str) -> Result<f64> {
        let idx = self.position(name)?;
        Ok(self.metrics[idx].value)
    }

    /// Overwrite a value. Out-of-range values are rejected, not clamped.
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let idx = self.position(name)?;
        let m = &mut self.metrics[idx];
        if !value.is_finite() || value < m.min || value > m.max {
            return Err(FleetPulseError::InvalidRange {
                name: m.name.clone(),
                value,
                min: m.min,
                max: m.max,
            });
        }
        m.value = value;
        Ok(())
    }

    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.index.get(name).map(|&i| &self.metrics[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.metrics.iter().map(|m| m.name())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FleetPulseError::UnknownMetric(name.to_string()))
    }
}
