// Analysis service - Use case for building trend charts from a UI snapshot
use crate::application::event_overlay::{active_events, align_events, EventMarker};
use crate::application::series_normalizer::{combined, stacked, ChartMode, CombinedChart, StackedSeries};
use crate::application::series_selector::select_active;
use crate::domain::catalog::{DataPoint, EnabledMap, MeasurementGroup, TimeSeriesStore};
use crate::domain::error::ItemFailure;
use crate::domain::event::EventItem;
use crate::domain::time_range::TimeRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything the charts depend on, sent with each request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub mode: ChartMode,
    /// Falls back to each source's default flag when absent.
    #[serde(default)]
    pub enabled_sources: Option<EnabledMap>,
    #[serde(default)]
    pub enabled_events: Option<EnabledMap>,
    #[serde(default)]
    pub show_events: bool,
    #[serde(default)]
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub mode: ChartMode,
    pub range_label: String,
    pub active_count: usize,
    /// No series to draw; render the empty state.
    pub empty: bool,
    pub stacked: Vec<StackedSeries>,
    pub combined: Option<CombinedChart>,
    pub events: Vec<EventItem>,
    pub markers: Vec<EventMarker>,
    pub failures: Vec<ItemFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: MeasurementGroup,
    pub active_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub groups: Vec<GroupSummary>,
    pub events: Vec<EventItem>,
    pub enabled_sources: EnabledMap,
    pub enabled_events: EnabledMap,
    pub active_count: usize,
    /// Most recent sample per source that has data.
    pub latest: BTreeMap<String, DataPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleResult {
    pub enabled_sources: EnabledMap,
    pub active_count: usize,
    pub group_counts: BTreeMap<String, usize>,
}

#[derive(Clone)]
pub struct AnalysisService {
    groups: Arc<Vec<MeasurementGroup>>,
    store: Arc<TimeSeriesStore>,
    events: Arc<Vec<EventItem>>,
    default_events: EnabledMap,
    range_end: NaiveDate,
}

impl AnalysisService {
    pub fn new(
        groups: Vec<MeasurementGroup>,
        store: TimeSeriesStore,
        events: Vec<EventItem>,
        default_events: EnabledMap,
        range_end: NaiveDate,
    ) -> Self {
        Self {
            groups: Arc::new(groups),
            store: Arc::new(store),
            events: Arc::new(events),
            default_events,
            range_end,
        }
    }

    pub fn catalog(&self) -> CatalogView {
        let enabled = EnabledMap::from_defaults(&self.groups);
        CatalogView {
            groups: self.summarize(&enabled),
            events: self.events.to_vec(),
            active_count: enabled.active_count(),
            enabled_sources: enabled,
            enabled_events: self.default_events.clone(),
            latest: self
                .groups
                .iter()
                .flat_map(|g| g.sources.iter())
                .filter_map(|s| Some((s.id.clone(), self.store.latest(&s.id)?.clone())))
                .collect(),
        }
    }

    pub fn toggle_source(&self, enabled: &EnabledMap, source_id: &str) -> ToggleResult {
        let next = enabled.toggled(source_id);
        tracing::debug!(
            "Toggled {} -> {}",
            source_id,
            next.is_enabled(source_id)
        );
        ToggleResult {
            active_count: next.active_count(),
            group_counts: self
                .summarize(&next)
                .into_iter()
                .map(|s| (s.group.id, s.active_count))
                .collect(),
            enabled_sources: next,
        }
    }

    pub fn view(&self, request: &AnalysisRequest) -> AnalysisView {
        let enabled_sources = request
            .enabled_sources
            .clone()
            .unwrap_or_else(|| EnabledMap::from_defaults(&self.groups));
        let enabled_events = request
            .enabled_events
            .as_ref()
            .unwrap_or(&self.default_events);

        let series = select_active(&self.groups, &enabled_sources, &self.store);
        let events = active_events(&self.events, enabled_events);

        tracing::debug!(
            "Analysis view: mode={:?}, {} active series, {} active events",
            request.mode,
            series.len(),
            events.len()
        );

        let mut view = AnalysisView {
            mode: request.mode,
            range_label: request.time_range.label(self.range_end),
            active_count: enabled_sources.active_count(),
            empty: series.is_empty(),
            stacked: Vec::new(),
            combined: None,
            events,
            markers: Vec::new(),
            failures: Vec::new(),
        };
        if series.is_empty() {
            return view;
        }

        match request.mode {
            ChartMode::Stacked => view.stacked = stacked(&series),
            ChartMode::Combined => view.combined = Some(combined(&series)),
        }

        if request.show_events {
            // Markers sit on the longest series' dates, which is also the
            // combined chart's axis.
            let axis: Vec<String> = series
                .iter()
                .reduce(|a, b| if a.data.len() >= b.data.len() { a } else { b })
                .map(|s| s.data.iter().map(|p| p.date.clone()).collect())
                .unwrap_or_default();
            let alignment = align_events(&view.events, &axis, self.range_end);
            view.markers = alignment.markers;
            view.failures = alignment.failures;
        }

        view
    }

    fn summarize(&self, enabled: &EnabledMap) -> Vec<GroupSummary> {
        self.groups
            .iter()
            .map(|g| GroupSummary {
                active_count: enabled.group_active_count(g),
                group: g.clone(),
            })
            .collect()
    }
}
