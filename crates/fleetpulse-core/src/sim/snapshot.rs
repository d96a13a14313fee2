use serde::Serialize;

/// One metric value inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub value: f64,
}

/// Immutable point-in-time copy of every metric, in registration order.
///
/// `seq` counts `advance_all` calls on the producing store; snapshots taken
/// without advancing repeat the last sequence number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    seq: u64,
    entries: Vec<SnapshotEntry>,
}

impl MetricSnapshot {
    pub(crate) fn new(seq: u64, entries: Vec<SnapshotEntry>) -> Self {
        Self { seq, entries }
    }

    /// Build a snapshot by hand (view layers and tests feed these to a renderer).
    pub fn from_pairs<N: Into<String>>(seq: u64, pairs: impl IntoIterator<Item = (N, f64)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(name, value)| SnapshotEntry {
                name: name.into(),
                value,
            })
            .collect();
        Self { seq, entries }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|e| (e.name.as_str(), e.value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
