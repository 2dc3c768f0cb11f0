// ICP service - Lab test listing and parameter gauges
use crate::domain::calendar::parse_date;
use crate::domain::error::AnalysisError;
use crate::domain::icp::{
    sparkline, HistoryEntry, HistoryPoint, IcpTest, Parameter, ParameterStatus, RangeGauge,
    ValueDomain,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct IcpTestSummary {
    pub id: String,
    pub barcode: String,
    pub date: String,
    pub tank_name: String,
    pub out_of_range_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterView {
    #[serde(flatten)]
    pub parameter: Parameter,
    pub gauge: RangeGauge,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterGroupView {
    pub name: String,
    pub parameters: Vec<ParameterView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IcpTestView {
    pub id: String,
    pub barcode: String,
    pub date: String,
    pub tank_name: String,
    pub groups: Vec<ParameterGroupView>,
}

/// Readings of one element across tests, with the reference band taken
/// from the most recent test that measured it.
#[derive(Debug, Clone, Serialize)]
pub struct ElementHistoryView {
    pub element_id: String,
    pub name: String,
    pub unit: String,
    pub range_min: f64,
    pub range_max: f64,
    pub domain: Option<ValueDomain>,
    pub points: Vec<HistoryPoint>,
}

#[derive(Clone)]
pub struct IcpService {
    tests: Vec<IcpTest>,
    history: HashMap<String, Vec<HistoryEntry>>,
}

impl IcpService {
    pub fn new(tests: Vec<IcpTest>, history: HashMap<String, Vec<HistoryEntry>>) -> Self {
        Self { tests, history }
    }

    pub fn list(&self) -> Vec<IcpTestSummary> {
        self.tests
            .iter()
            .map(|t| IcpTestSummary {
                id: t.id.clone(),
                barcode: t.barcode.clone(),
                date: t.date.clone(),
                tank_name: t.tank_name.clone(),
                out_of_range_count: t
                    .groups
                    .iter()
                    .flat_map(|g| g.parameters.iter())
                    .filter(|p| p.status.is_out_of_range())
                    .count(),
            })
            .collect()
    }

    /// A test with gauges; `out_of_range_only` keeps parameters that are not
    /// in range and drops groups left empty.
    pub fn get(&self, id: &str, out_of_range_only: bool) -> Result<IcpTestView, AnalysisError> {
        let test = self
            .tests
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AnalysisError::not_found("icp test", id))?;

        let groups = test
            .groups
            .iter()
            .filter_map(|group| {
                let parameters: Vec<ParameterView> = group
                    .parameters
                    .iter()
                    .filter(|p| !out_of_range_only || p.status != ParameterStatus::InRange)
                    .map(|p| ParameterView {
                        parameter: p.clone(),
                        gauge: RangeGauge::for_parameter(p),
                    })
                    .collect();
                if parameters.is_empty() {
                    None
                } else {
                    Some(ParameterGroupView {
                        name: group.name.clone(),
                        parameters,
                    })
                }
            })
            .collect();

        Ok(IcpTestView {
            id: test.id.clone(),
            barcode: test.barcode.clone(),
            date: test.date.clone(),
            tank_name: test.tank_name.clone(),
            groups,
        })
    }

    pub fn element_history(&self, element_id: &str) -> Result<ElementHistoryView, AnalysisError> {
        let parameter = self
            .latest_parameter(element_id)
            .ok_or_else(|| AnalysisError::not_found("element", element_id))?;

        let entries = self
            .history
            .get(element_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if entries.is_empty() {
            tracing::debug!("No history recorded for element {}", element_id);
        }
        let (domain, points) = sparkline(entries, parameter.range_min, parameter.range_max);

        Ok(ElementHistoryView {
            element_id: element_id.to_string(),
            name: parameter.name.clone(),
            unit: parameter.unit.clone(),
            range_min: parameter.range_min,
            range_max: parameter.range_max,
            domain,
            points,
        })
    }

    /// The parameter from the latest-dated test that measured it; tests with
    /// unreadable dates rank below every dated one.
    fn latest_parameter(&self, element_id: &str) -> Option<&Parameter> {
        self.tests
            .iter()
            .filter_map(|t| {
                let param = t
                    .groups
                    .iter()
                    .flat_map(|g| g.parameters.iter())
                    .find(|p| p.id == element_id)?;
                Some((parse_date(&t.date).ok(), param))
            })
            .max_by_key(|(date, _)| *date)
            .map(|(_, param)| param)
    }
}
