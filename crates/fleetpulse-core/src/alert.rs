//! Threshold watches over successive snapshots.
//!
//! A watch fires once when its metric moves from outside the alert region to
//! inside it. It re-arms after the metric leaves the region again. The first
//! snapshot a watch sees only establishes where the metric starts.

use crate::sim::snapshot::MetricSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Below(f64),
    Above(f64),
}

impl Threshold {
    fn contains(self, value: f64) -> bool {
        match self {
            Threshold::Below(level) => value < level,
            Threshold::Above(level) => value > level,
        }
    }
}

/// A watch that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub metric: String,
    pub value: f64,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ThresholdWatch {
    metric: String,
    threshold: Threshold,
    message: String,
    inside: Option<bool>,
}

impl ThresholdWatch {
    pub fn new(metric: impl Into<String>, threshold: Threshold, message: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            threshold,
            message: message.into(),
            inside: None,
        }
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Fires when this snapshot crosses into the region.
    pub fn observe(&mut self, snapshot: &MetricSnapshot) -> Option<Crossing> {
        let value = snapshot.get(&self.metric)?;
        let now_inside = self.threshold.contains(value);
        let was_inside = self.inside.replace(now_inside);
        if was_inside != Some(false) || !now_inside {
            return None;
        }
        tracing::info!(metric = %self.metric, value, "threshold crossed");
        Some(Crossing {
            metric: self.metric.clone(),
            value,
            message: self.message.clone(),
        })
    }
}

/// Ordered collection of watches.
#[derive(Debug, Clone, Default)]
pub struct AlertSet {
    watches: Vec<ThresholdWatch>,
}

impl AlertSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, watch: ThresholdWatch) {
        self.watches.push(watch);
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Every watch that fired on this snapshot, in watch order.
    pub fn observe(&mut self, snapshot: &MetricSnapshot) -> Vec<Crossing> {
        self.watches
            .iter_mut()
            .filter_map(|w| w.observe(snapshot))
            .collect()
    }
}
