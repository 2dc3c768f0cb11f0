// ICP lab test domain model
use serde::{Deserialize, Serialize};

/// Padding applied either side of the reference range on a gauge, as a
/// fraction of the range width.
const GAUGE_PADDING: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterStatus {
    InRange,
    Low,
    High,
    Elevated,
}

impl ParameterStatus {
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ParameterStatus::Low | ParameterStatus::High)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub value: f64,
    pub unit: String,
    pub range_min: f64,
    pub range_max: f64,
    #[serde(default)]
    pub desired: String,
    pub status: ParameterStatus,
    #[serde(default)]
    pub dosing_recommendation: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcpTest {
    pub id: String,
    pub barcode: String,
    pub date: String,
    pub tank_name: String,
    #[serde(default)]
    pub groups: Vec<ParameterGroup>,
}

/// Value marker and reference band on a padded scale, as fractions in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeGauge {
    pub scale_min: f64,
    pub scale_max: f64,
    pub marker: f64,
    pub band_start: f64,
    pub band_width: f64,
    pub out_of_range: bool,
}

impl RangeGauge {
    pub fn for_parameter(param: &Parameter) -> Self {
        let padding = (param.range_max - param.range_min) * GAUGE_PADDING;
        let scale_min = param.range_min - padding;
        let scale_max = param.range_max + padding;
        let span = scale_max - scale_min;

        // Degenerate range: everything collapses onto the middle.
        if span <= 0.0 {
            return Self {
                scale_min,
                scale_max,
                marker: 0.5,
                band_start: 0.5,
                band_width: 0.0,
                out_of_range: param.status.is_out_of_range(),
            };
        }

        let clamped = param.value.clamp(scale_min, scale_max);
        Self {
            scale_min,
            scale_max,
            marker: (clamped - scale_min) / span,
            band_start: (param.range_min - scale_min) / span,
            band_width: (param.range_max - param.range_min) / span,
            out_of_range: param.status.is_out_of_range(),
        }
    }
}

/// One past reading of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub value: f64,
}

/// Smallest and largest reading, the vertical extent of a sparkline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    pub fn of(entries: &[HistoryEntry]) -> Option<Self> {
        let mut values = entries.iter().map(|e| e.value).filter(|v| v.is_finite());
        let first = values.next()?;
        Some(values.fold(Self { min: first, max: first }, |d, v| Self {
            min: d.min.min(v),
            max: d.max.max(v),
        }))
    }

    /// Height of `value` within the domain as a fraction; a flat history
    /// is treated as spanning one unit so its line sits on the floor.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        let span = if span > 0.0 { span } else { 1.0 };
        (value - self.min) / span
    }
}

/// A history reading placed on a unit-square sparkline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: String,
    pub value: f64,
    pub out_of_range: bool,
    pub x: f64,
    pub y: f64,
}

pub fn sparkline(
    entries: &[HistoryEntry],
    range_min: f64,
    range_max: f64,
) -> (Option<ValueDomain>, Vec<HistoryPoint>) {
    let Some(domain) = ValueDomain::of(entries) else {
        return (None, Vec::new());
    };
    let last = entries.len().saturating_sub(1);
    let points = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| HistoryPoint {
            date: entry.date.clone(),
            value: entry.value,
            out_of_range: entry.value < range_min || entry.value > range_max,
            x: if last == 0 { 0.0 } else { i as f64 / last as f64 },
            y: domain.fraction(entry.value),
        })
        .collect();
    (Some(domain), points)
}
