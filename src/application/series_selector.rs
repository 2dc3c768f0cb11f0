// Series selection - Resolve enabled sources into renderable series
use crate::domain::catalog::{ActiveSeries, EnabledMap, MeasurementGroup, TimeSeriesStore};

/// Colors handed out to active series in emission order.
pub const PALETTE: [&str; 7] = [
    "hsl(210, 80%, 55%)",
    "hsl(145, 60%, 45%)",
    "hsl(25, 85%, 55%)",
    "hsl(280, 60%, 55%)",
    "hsl(340, 70%, 55%)",
    "hsl(50, 80%, 45%)",
    "hsl(195, 70%, 50%)",
];

/// Join the catalog with the store for every enabled source that has data.
///
/// Groups and sources are walked in declared order and colors cycle through
/// [`PALETTE`] in that same order, so the k-th active series always gets
/// `PALETTE[k % PALETTE.len()]`. An empty result means nothing to render.
pub fn select_active(
    groups: &[MeasurementGroup],
    enabled: &EnabledMap,
    store: &TimeSeriesStore,
) -> Vec<ActiveSeries> {
    let mut active = Vec::new();

    for group in groups {
        for source in &group.sources {
            if !enabled.is_enabled(&source.id) {
                continue;
            }
            let Some(points) = store.get(&source.id) else {
                tracing::debug!("Source {} is enabled but has no samples", source.id);
                continue;
            };

            active.push(ActiveSeries {
                source_id: source.id.clone(),
                label: format!("{} - {}", group.name, source.name),
                group_name: group.name.clone(),
                unit: group.unit.clone(),
                color: PALETTE[active.len() % PALETTE.len()].to_string(),
                data: points.to_vec(),
            });
        }
    }

    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{DataPoint, Source};
    use std::collections::HashMap;

    fn store_with(ids: &[&str]) -> TimeSeriesStore {
        let series: HashMap<String, Vec<DataPoint>> = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    vec![DataPoint::new("Jan 1", 10.0), DataPoint::new("Jan 2", 12.0)],
                )
            })
            .collect();
        TimeSeriesStore::new(series)
    }

    #[test]
    fn test_single_enabled_source() {
        let groups = vec![MeasurementGroup::new(
            "alk",
            "Alk",
            "dKH",
            vec![Source::new("a1", "Alkatronic", false), Source::new("a2", "Manual", false)],
        )];
        let enabled = EnabledMap::from([("a1", true)]);
        let store = store_with(&["a1"]);

        let active = select_active(&groups, &enabled, &store);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].source_id, "a1");
        assert_eq!(active[0].label, "Alk - Alkatronic");
        assert_eq!(active[0].unit, "dKH");
        assert_eq!(active[0].data.len(), 2);
        assert_eq!(active[0].color, PALETTE[0]);
    }

    #[test]
    fn test_nothing_enabled_is_empty() {
        let groups = vec![MeasurementGroup::new(
            "alk",
            "Alk",
            "dKH",
            vec![Source::new("a1", "Alkatronic", true)],
        )];
        let store = store_with(&["a1"]);

        assert!(select_active(&groups, &EnabledMap::new(), &store).is_empty());
        assert!(select_active(&groups, &EnabledMap::from([("a1", false)]), &store).is_empty());
        assert!(select_active(&[], &EnabledMap::from([("a1", true)]), &store).is_empty());
    }

    #[test]
    fn test_enabled_without_data_is_skipped() {
        let groups = vec![MeasurementGroup::new(
            "ph",
            "pH",
            "",
            vec![Source::new("ph-apex", "Apex Fusion", true), Source::new("ph-manual", "Manual", true)],
        )];
        let enabled = EnabledMap::from([("ph-apex", true), ("ph-manual", true)]);
        let store = store_with(&["ph-manual"]);

        let active = select_active(&groups, &enabled, &store);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].source_id, "ph-manual");
        // Colors are assigned by emitted position, not declared position
        assert_eq!(active[0].color, PALETTE[0]);
    }

    #[test]
    fn test_palette_cycles_in_declared_order() {
        let ids: Vec<String> = (0..10).map(|i| format!("s{}", i)).collect();
        let sources = ids.iter().map(|id| Source::new(id, id, true)).collect();
        let groups = vec![MeasurementGroup::new("g", "G", "ppm", sources)];
        let enabled = ids
            .iter()
            .fold(EnabledMap::new(), |map, id| map.with(id, true));
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let store = store_with(&id_refs);

        let active = select_active(&groups, &enabled, &store);
        assert_eq!(active.len(), 10);
        for (k, series) in active.iter().enumerate() {
            assert_eq!(series.source_id, ids[k]);
            assert_eq!(series.color, PALETTE[k % PALETTE.len()]);
        }

        // Deterministic across calls
        let again = select_active(&groups, &enabled, &store);
        let colors: Vec<_> = active.iter().map(|s| s.color.clone()).collect();
        let colors_again: Vec<_> = again.iter().map(|s| s.color.clone()).collect();
        assert_eq!(colors, colors_again);
    }
}
