// Measurement catalog and time-series domain models
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named data feed, e.g. a controller sensor or a manual log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

impl Source {
    pub fn new(id: &str, name: &str, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            enabled,
        }
    }
}

/// A logical parameter (Alkalinity, Calcium, ...) measured by one or more sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl MeasurementGroup {
    pub fn new(id: &str, name: &str, unit: &str, sources: Vec<Source>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            sources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: &str, value: f64) -> Self {
        Self {
            date: date.to_string(),
            value,
        }
    }
}

/// Per-source ordered samples.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    series: HashMap<String, Vec<DataPoint>>,
}

impl TimeSeriesStore {
    pub fn new(series: HashMap<String, Vec<DataPoint>>) -> Self {
        Self { series }
    }

    /// Samples for a source, `None` when the source has no data at all.
    pub fn get(&self, source_id: &str) -> Option<&[DataPoint]> {
        self.series
            .get(source_id)
            .filter(|points| !points.is_empty())
            .map(Vec::as_slice)
    }

    pub fn latest(&self, source_id: &str) -> Option<&DataPoint> {
        self.get(source_id).and_then(|points| points.last())
    }
}

/// Snapshot of on/off flags keyed by source or event id. Missing ids are off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnabledMap(HashMap<String, bool>);

impl EnabledMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed flags from each source's default `enabled` value.
    pub fn from_defaults(groups: &[MeasurementGroup]) -> Self {
        let flags = groups
            .iter()
            .flat_map(|g| g.sources.iter())
            .map(|s| (s.id.clone(), s.enabled))
            .collect();
        Self(flags)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn with(mut self, id: &str, enabled: bool) -> Self {
        self.0.insert(id.to_string(), enabled);
        self
    }

    /// New snapshot with one flag flipped; a missing id becomes enabled.
    pub fn toggled(&self, id: &str) -> Self {
        let current = self.is_enabled(id);
        self.clone().with(id, !current)
    }

    pub fn active_count(&self) -> usize {
        self.0.values().filter(|enabled| **enabled).count()
    }

    pub fn group_active_count(&self, group: &MeasurementGroup) -> usize {
        group
            .sources
            .iter()
            .filter(|s| self.is_enabled(&s.id))
            .count()
    }
}

impl<const N: usize> From<[(&str, bool); N]> for EnabledMap {
    fn from(entries: [(&str, bool); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(id, enabled)| (id.to_string(), enabled))
                .collect(),
        )
    }
}

/// A source that is switched on and has data, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSeries {
    pub source_id: String,
    pub label: String,
    pub group_name: String,
    pub unit: String,
    pub color: String,
    pub data: Vec<DataPoint>,
}
