// Configuration loading for the server and the seeded fixtures
use crate::domain::calendar::parse_date;
use crate::domain::catalog::{DataPoint, EnabledMap, MeasurementGroup, TimeSeriesStore};
use crate::domain::dosing::{DosingEvent, TraceBatch, TraceTemplate};
use crate::domain::equipment::EquipmentItem;
use crate::domain::error::AnalysisError;
use crate::domain::event::EventItem;
use crate::domain::icp::{HistoryEntry, IcpTest};
use crate::domain::livestock::LivestockItem;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Combined chart rows carry the date under this key next to per-source values.
const RESERVED_ROW_KEY: &str = "date";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Brotli-encode responses for clients that accept `br`.
    #[serde(default = "default_compress")]
    pub compress_responses: bool,
}

fn default_compress() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixturesConfig {
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub groups: Vec<MeasurementGroup>,
    /// Readings keyed by source id.
    #[serde(default)]
    pub series: HashMap<String, Vec<DataPoint>>,
    #[serde(default)]
    pub events: Vec<EventItem>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    #[serde(default)]
    pub livestock: Vec<LivestockItem>,
    #[serde(default)]
    pub icp_tests: Vec<IcpTest>,
    /// Past readings keyed by ICP parameter id.
    #[serde(default)]
    pub icp_history: HashMap<String, Vec<HistoryEntry>>,
    #[serde(default)]
    pub dosing_events: Vec<DosingEvent>,
    #[serde(default)]
    pub trace_batches: Vec<TraceBatch>,
    #[serde(default)]
    pub trace_templates: Vec<TraceTemplate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisSettings {
    /// ISO date the charted window ends on.
    pub range_end: String,
    /// Event ids shown when a client sends no event selection.
    #[serde(default)]
    pub default_events: Vec<String>,
}

impl FixturesConfig {
    /// Reject fixtures that would make lookups ambiguous.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let mut seen = HashSet::new();
        for source in self.groups.iter().flat_map(|g| g.sources.iter()) {
            if source.id == RESERVED_ROW_KEY {
                return Err(AnalysisError::Validation(format!(
                    "source id '{}' is reserved for combined chart rows",
                    source.id
                )));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(AnalysisError::Validation(format!(
                    "duplicate source id '{}'",
                    source.id
                )));
            }
        }

        let mut events = HashSet::new();
        for event in &self.events {
            if !events.insert(event.id.as_str()) {
                return Err(AnalysisError::Validation(format!(
                    "duplicate event id '{}'",
                    event.id
                )));
            }
        }
        for id in &self.analysis.default_events {
            if !events.contains(id.as_str()) {
                return Err(AnalysisError::Validation(format!(
                    "default event '{}' is not defined",
                    id
                )));
            }
        }

        let mut doses = HashSet::new();
        for event in &self.dosing_events {
            if !doses.insert(event.id.as_str()) {
                return Err(AnalysisError::Validation(format!(
                    "duplicate dosing event id '{}'",
                    event.id
                )));
            }
        }

        for id in self.series.keys() {
            if !seen.contains(id.as_str()) {
                tracing::warn!("Series '{}' has no source in any group", id);
            }
        }

        self.range_end().map(|_| ())
    }

    pub fn range_end(&self) -> Result<NaiveDate, AnalysisError> {
        parse_date(&self.analysis.range_end)
    }

    pub fn default_events(&self) -> EnabledMap {
        self.analysis
            .default_events
            .iter()
            .fold(EnabledMap::new(), |map, id| map.with(id, true))
    }

    pub fn store(&self) -> TimeSeriesStore {
        TimeSeriesStore::new(self.series.clone())
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(config::Environment::with_prefix("REEF").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_fixtures_config() -> anyhow::Result<FixturesConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/fixtures"))
        .build()?;

    let fixtures: FixturesConfig = settings.try_deserialize()?;
    fixtures.validate()?;
    Ok(fixtures)
}
