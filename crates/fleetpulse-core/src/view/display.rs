//! Snapshot -> text, reporting only what changed.
//!
//! The renderer is a one-way function of store state: it caches the last text
//! it produced per metric and never reads rendered text back.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FleetPulseError, Result};
use crate::sim::snapshot::MetricSnapshot;

/// Declarative formats (also the config representation).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum FormatSpec {
    /// `94.2%`
    Percent {
        #[serde(default = "default_percent_decimals")]
        decimals: u8,
    },
    /// `24`
    Count,
    /// `{value}` replaced by the number, e.g. `"{value} Active"`.
    Template {
        template: String,
        #[serde(default)]
        decimals: u8,
    },
}

fn default_percent_decimals() -> u8 {
    1
}

impl FormatSpec {
    pub fn format(&self, value: f64) -> String {
        match self {
            FormatSpec::Percent { decimals } => format!("{:.*}%", *decimals as usize, value),
            FormatSpec::Count => format_number(value, 0),
            FormatSpec::Template { template, decimals } => {
                template.replace("{value}", &format_number(value, *decimals))
            }
        }
    }
}

fn format_number(value: f64, decimals: u8) -> String {
    if decimals == 0 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.*}", decimals as usize, value)
    }
}

/// Value -> display string.
pub struct Formatter(Box<dyn Fn(f64) -> String + Send + Sync>);

impl Formatter {
    pub fn new(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Fixed-decimal percentage.
    pub fn fixed_percent(decimals: u8) -> Self {
        FormatSpec::Percent { decimals }.into()
    }

    /// Rounded integer.
    pub fn count() -> Self {
        FormatSpec::Count.into()
    }

    pub fn apply(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl From<FormatSpec> for Formatter {
    fn from(spec: FormatSpec) -> Self {
        Formatter::new(move |v| spec.format(v))
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

/// One text update for the view layer to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub name: String,
    /// `None` on the first render of a metric.
    pub old_text: Option<String>,
    pub new_text: String,
}

#[derive(Debug, Default)]
pub struct DisplaySync {
    formats: HashMap<String, Formatter>,
    rendered: HashMap<String, String>,
}

impl DisplaySync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate (or replace) the formatter for a metric.
    pub fn configure_format(&mut self, name: impl Into<String>, formatter: impl Into<Formatter>) {
        self.formats.insert(name.into(), formatter.into());
    }

    pub fn has_format(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Render every metric that has a format, in snapshot order.
    /// Metrics without a format are skipped.
    pub fn render(&mut self, snapshot: &MetricSnapshot) -> Vec<ChangeRecord> {
        let mut changes = Vec::new();
        for (name, value) in snapshot.iter() {
            let Some(formatter) = self.formats.get(name) else {
                continue;
            };
            let text = formatter.apply(value);
            if let Some(change) = self.remember(name, text) {
                changes.push(change);
            }
        }
        changes
    }

    /// Render a single value. Fails if the metric has no format.
    pub fn render_value(&mut self, name: &str, value: f64) -> Result<Option<ChangeRecord>> {
        let text = self
            .formats
            .get(name)
            .ok_or_else(|| FleetPulseError::UnknownFormat(name.to_string()))?
            .apply(value);
        Ok(self.remember(name, text))
    }

    /// Last text produced for a metric.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.rendered.get(name).map(String::as_str)
    }

    /// Drop cached text so the next render reports every metric again
    /// (e.g. after the view was rebuilt).
    pub fn reset(&mut self) {
        self.rendered.clear();
    }

    /// Undo the cache update for changes that never reached the view, so the
    /// next render reports them again.
    pub fn rollback(&mut self, changes: &[ChangeRecord]) {
        for c in changes {
            match &c.old_text {
                Some(old) => {
                    self.rendered.insert(c.name.clone(), old.clone());
                }
                None => {
                    self.rendered.remove(&c.name);
                }
            }
        }
    }

    /// Drop the formatter and cached text for a key that left the view.
    /// Returns whether the key had been rendered.
    pub fn forget(&mut self, name: &str) -> bool {
        self.formats.remove(name);
        self.rendered.remove(name).is_some()
    }

    fn remember(&mut self, name: &str, text: String) -> Option<ChangeRecord> {
        match self.rendered.get_mut(name) {
            Some(prev) if *prev == text => None,
            Some(prev) => {
                let old = std::mem::replace(prev, text.clone());
                Some(ChangeRecord {
                    name: name.to_string(),
                    old_text: Some(old),
                    new_text: text,
                })
            }
            None => {
                self.rendered.insert(name.to_string(), text.clone());
                Some(ChangeRecord {
                    name: name.to_string(),
                    old_text: None,
                    new_text: text,
                })
            }
        }
    }
}
