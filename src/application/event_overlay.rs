// Event overlay - Filter events and pin them onto a chart's date axis
use crate::domain::calendar::{parse_date, resolve_axis_label};
use crate::domain::catalog::EnabledMap;
use crate::domain::error::ItemFailure;
use crate::domain::event::{EventIcon, EventItem};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Enabled events, in input order.
pub fn active_events(events: &[EventItem], enabled: &EnabledMap) -> Vec<EventItem> {
    events
        .iter()
        .filter(|e| enabled.is_enabled(&e.id))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct EventMarker {
    pub id: String,
    pub name: String,
    pub icon: EventIcon,
    pub glyph: &'static str,
    /// ISO calendar date of the event.
    pub date: String,
    /// Index into the chart's axis, `None` when the date is not on the axis.
    pub axis_index: Option<usize>,
    pub axis_label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventAlignment {
    pub markers: Vec<EventMarker>,
    pub failures: Vec<ItemFailure>,
}

/// Match events to axis categories by calendar date.
///
/// Axis labels usually omit the year (`Jan 11`); each resolves to its latest
/// occurrence on or before `axis_end`. An event whose date cannot be parsed is
/// reported in `failures` and does not affect the others.
pub fn align_events(events: &[EventItem], axis: &[String], axis_end: NaiveDate) -> EventAlignment {
    let mut positions: HashMap<NaiveDate, usize> = HashMap::with_capacity(axis.len());
    for (idx, label) in axis.iter().enumerate() {
        match resolve_axis_label(label, axis_end) {
            Ok(date) => {
                positions.entry(date).or_insert(idx);
            }
            Err(e) => tracing::debug!("Ignoring axis label: {}", e),
        }
    }

    let mut alignment = EventAlignment::default();
    for event in events {
        match parse_date(&event.date) {
            Ok(date) => {
                let axis_index = positions.get(&date).copied();
                alignment.markers.push(EventMarker {
                    id: event.id.clone(),
                    name: event.name.clone(),
                    icon: event.icon,
                    glyph: event.icon.glyph(),
                    date: date.format("%Y-%m-%d").to_string(),
                    axis_index,
                    axis_label: axis_index.map(|i| axis[i].clone()),
                });
            }
            Err(e) => {
                tracing::warn!("Event {} has an unusable date: {}", event.id, e);
                alignment.failures.push(ItemFailure::new(&event.id, &e));
            }
        }
    }
    alignment
}
