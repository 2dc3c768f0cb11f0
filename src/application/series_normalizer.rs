// Series normalization - Stacked and combined chart projections
use crate::domain::catalog::{ActiveSeries, DataPoint};
use crate::domain::error::{AnalysisError, ItemFailure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Stacked,
    Combined,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesDomain {
    pub min: f64,
    pub max: f64,
}

/// One series on its own axis; values are passed through unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct StackedSeries {
    #[serde(flatten)]
    pub series: ActiveSeries,
    pub domain: SeriesDomain,
    pub latest: Option<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    pub date: String,
    /// Percent deviation from the series mean, keyed by source id.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinedLegend {
    pub source_id: String,
    pub label: String,
    pub unit: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CombinedChart {
    pub rows: Vec<CombinedRow>,
    pub legend: Vec<CombinedLegend>,
    /// Series left out of the combined axis, e.g. because their mean is zero.
    pub skipped: Vec<ItemFailure>,
}

pub fn stacked(series: &[ActiveSeries]) -> Vec<StackedSeries> {
    series
        .iter()
        .map(|s| StackedSeries {
            series: s.clone(),
            domain: domain_of(&s.data),
            latest: s.data.last().cloned(),
        })
        .collect()
}

fn domain_of(points: &[DataPoint]) -> SeriesDomain {
    let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.value), hi.max(p.value))
    });
    if points.is_empty() {
        SeriesDomain { min: 0.0, max: 0.0 }
    } else {
        SeriesDomain { min, max }
    }
}

fn mean(points: &[DataPoint]) -> f64 {
    points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64
}

/// Percent deviation of `value` from `mean`, rounded half away from zero to
/// two decimal places. Never returns negative zero.
pub fn percent_deviation(value: f64, mean: f64) -> f64 {
    let pct = (((value - mean) / mean) * 10000.0).round() / 100.0;
    if pct == 0.0 { 0.0 } else { pct }
}

/// Project every series onto one shared axis as percent deviation from its
/// own mean.
///
/// The longest series supplies the date axis (first one wins a tie). Shorter
/// series simply have no value at indices past their end. A series whose mean
/// is zero cannot be expressed as a percentage and is reported in `skipped`.
pub fn combined(series: &[ActiveSeries]) -> CombinedChart {
    let Some(reference) = series
        .iter()
        .reduce(|a, b| if a.data.len() >= b.data.len() { a } else { b })
    else {
        return CombinedChart::default();
    };

    let mut skipped = Vec::new();
    let mut usable: Vec<(&ActiveSeries, f64)> = Vec::with_capacity(series.len());
    for s in series {
        let m = mean(&s.data);
        if m == 0.0 || !m.is_finite() {
            let err = AnalysisError::DivisionByZero {
                source_id: s.source_id.clone(),
            };
            tracing::warn!("Skipping series in combined view: {}", err);
            skipped.push(ItemFailure::new(&s.source_id, &err));
            continue;
        }
        usable.push((s, m));
    }

    let rows = reference
        .data
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let values = usable
                .iter()
                .filter_map(|(s, m)| {
                    s.data
                        .get(i)
                        .map(|p| (s.source_id.clone(), percent_deviation(p.value, *m)))
                })
                .collect();
            CombinedRow {
                date: point.date.clone(),
                values,
            }
        })
        .collect();

    let legend = usable
        .iter()
        .map(|(s, _)| CombinedLegend {
            source_id: s.source_id.clone(),
            label: s.label.clone(),
            unit: s.unit.clone(),
            color: s.color.clone(),
        })
        .collect();

    CombinedChart {
        rows,
        legend,
        skipped,
    }
}
