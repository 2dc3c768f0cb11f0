// Timeline layout - Proportional bar geometry against a shared month axis
use crate::domain::calendar::{add_months, first_of_month, month_label, months_between, parse_date};
use crate::domain::error::{AnalysisError, ItemFailure};
use crate::domain::timeline::{
    BarGeometry, MonthLabel, TimelineEntry, TimelineLayout, TimelineSection,
};
use chrono::NaiveDate;

/// Empty months appended after the last occupied month.
const TRAILING_PADDING_MONTHS: u32 = 2;

struct ParsedEntry<'a> {
    entry: &'a TimelineEntry,
    start: NaiveDate,
    end: Option<NaiveDate>,
}

struct Axis {
    start: NaiveDate,
    total_months: u32,
    labels: Vec<MonthLabel>,
}

impl Axis {
    /// The axis starts on the first day of the earliest month seen and runs
    /// through the month of the latest date (normally `now`) plus padding.
    fn spanning(entries: &[ParsedEntry], now: NaiveDate) -> Self {
        let dates = entries
            .iter()
            .flat_map(|p| std::iter::once(p.start).chain(p.end))
            .chain(std::iter::once(now));
        let (earliest, latest) = dates.fold((now, now), |(lo, hi), d| (lo.min(d), hi.max(d)));

        let start = first_of_month(earliest);
        let occupied = months_between(latest, start).max(0) as u32 + 1;
        let total_months = occupied + TRAILING_PADDING_MONTHS;
        let labels = (0..total_months)
            .map(|i| {
                let month = add_months(start, i);
                MonthLabel {
                    label: month_label(month),
                    start: month.format("%Y-%m-%d").to_string(),
                }
            })
            .collect();

        Self {
            start,
            total_months,
            labels,
        }
    }

    fn bar(&self, parsed: &ParsedEntry, now: NaiveDate) -> BarGeometry {
        let offset = months_between(parsed.start, self.start).max(0) as u32;
        let end = parsed.end.unwrap_or(now);
        let duration = (months_between(end, parsed.start) + 1).max(1) as u32;
        let total = self.total_months as f64;

        BarGeometry {
            id: parsed.entry.id.clone(),
            name: parsed.entry.name.clone(),
            status: parsed.entry.status,
            quantity: parsed.entry.quantity,
            offset_months: offset,
            duration_months: duration,
            left: offset as f64 / total,
            width: duration as f64 / total,
        }
    }
}

fn parse_entry(entry: &TimelineEntry) -> Result<ParsedEntry<'_>, AnalysisError> {
    let start = parse_date(&entry.start)?;
    let end = entry.end.as_deref().map(parse_date).transpose()?;
    Ok(ParsedEntry { entry, start, end })
}

fn parse_entries(items: &[TimelineEntry]) -> (Vec<ParsedEntry<'_>>, Vec<ItemFailure>) {
    let mut parsed = Vec::with_capacity(items.len());
    let mut failures = Vec::new();

    for entry in items {
        match parse_entry(entry) {
            Ok(p) => parsed.push(p),
            Err(e) => {
                tracing::warn!("Timeline entry {} skipped: {}", entry.id, e);
                failures.push(ItemFailure::new(&entry.id, &e));
            }
        }
    }

    (parsed, failures)
}

/// Lay out items as one flat list ordered by start date (ties keep input order).
pub fn layout(items: &[TimelineEntry], now: NaiveDate) -> TimelineLayout {
    let (mut parsed, failures) = parse_entries(items);
    parsed.sort_by_key(|p| p.start);

    let axis = Axis::spanning(&parsed, now);
    let bars = parsed.iter().map(|p| axis.bar(p, now)).collect();

    TimelineLayout {
        axis: axis.labels,
        total_months: axis.total_months,
        sections: vec![TimelineSection { section: None, bars }],
        failures,
    }
}

/// Lay out items partitioned by section, in `order`, sharing one month axis.
///
/// Sections missing from `order` follow in first-seen order; sections with no
/// items are omitted. Items keep their input order within a section.
pub fn layout_sections(items: &[TimelineEntry], order: &[String], now: NaiveDate) -> TimelineLayout {
    let (parsed, failures) = parse_entries(items);
    let axis = Axis::spanning(&parsed, now);

    let mut names: Vec<Option<String>> = order.iter().cloned().map(Some).collect();
    for p in &parsed {
        if !names.contains(&p.entry.section) {
            names.push(p.entry.section.clone());
        }
    }

    let sections = names
        .into_iter()
        .filter_map(|name| {
            let bars: Vec<BarGeometry> = parsed
                .iter()
                .filter(|p| p.entry.section == name)
                .map(|p| axis.bar(p, now))
                .collect();
            if bars.is_empty() {
                None
            } else {
                Some(TimelineSection { section: name, bars })
            }
        })
        .collect();

    TimelineLayout {
        axis: axis.labels,
        total_months: axis.total_months,
        sections,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_closed_item() {
        let items = vec![TimelineEntry::new("1", "Reactor", "2024-01-15", Some("2024-03-15"))];
        let result = layout(&items, ymd(2024, 6, 1));

        assert_eq!(result.total_months, 8);
        assert_eq!(result.axis.len(), 8);
        assert_eq!(result.axis[0].label, "Jan 24");
        assert_eq!(result.axis[0].start, "2024-01-01");
        assert_eq!(result.axis[7].label, "Aug 24");

        let bar = result.bars().next().unwrap();
        assert_eq!(bar.offset_months, 0);
        assert_eq!(bar.duration_months, 3);
        assert_eq!(bar.left, 0.0);
        assert_eq!(bar.width, 0.375);
    }

    #[test]
    fn test_item_added_this_month_fits() {
        let now = ymd(2024, 6, 20);
        let items = vec![
            TimelineEntry::new("old", "Heater", "2023-11-05", None),
            TimelineEntry::new("new", "Doser", "2024-06-01", None),
        ];
        let result = layout(&items, now);
        let bar = result.bars().find(|b| b.id == "new").unwrap();
        assert!(bar.duration_months >= 1);
        assert!(bar.left + bar.width <= 1.0);

        for bar in result.bars() {
            assert!(bar.left >= 0.0);
            assert!(bar.left + bar.width <= 1.0);
        }
    }

    #[test]
    fn test_identical_dates_identical_geometry() {
        let items = vec![
            TimelineEntry::new("5", "Alkatronic", "2024-06-01", None),
            TimelineEntry::new("6", "Dosetronic", "2024-06-01", None),
            TimelineEntry::new("9", "UV", "2023-08-01", Some("2025-01-15")),
            TimelineEntry::new("10", "UV spare", "2023-08-01", Some("2025-01-15")),
        ];
        let result = layout(&items, ymd(2026, 2, 9));
        let bars: Vec<_> = result.bars().collect();
        let find = |id: &str| bars.iter().find(|b| b.id == id).unwrap();
        assert_eq!((find("5").left, find("5").width), (find("6").left, find("6").width));
        assert_eq!((find("9").left, find("9").width), (find("10").left, find("10").width));
    }

    #[test]
    fn test_flat_layout_sorts_by_start() {
        let items = vec![
            TimelineEntry::new("1", "Blenny", "2026-01-16", None),
            TimelineEntry::new("7", "Hawkfish", "2025-06-09", None),
            TimelineEntry::new("9", "Tomini Tang", "2025-05-09", None),
            TimelineEntry::new("11", "Wrasse", "2025-05-09", None),
        ];
        let result = layout(&items, ymd(2026, 2, 9));
        let ids: Vec<_> = result.bars().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "11", "7", "1"]);
        assert_eq!(result.axis[0].start, "2025-05-01");
    }

    #[test]
    fn test_sections_share_axis() {
        let items = vec![
            TimelineEntry::new("4", "Heater", "2023-11-05", None).in_section("Sump"),
            TimelineEntry::new("1", "Reefi Uno", "2024-03-15", None).in_section("Display Tank"),
            TimelineEntry::new("11", "Osmolator", "2023-06-20", None).in_section("ATO"),
            TimelineEntry::new("12", "Frag light", "2024-01-01", None).in_section("Frag Tank"),
        ];
        let order: Vec<String> = ["Display Tank", "Sump", "ATO", "Quarantine"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = layout_sections(&items, &order, ymd(2026, 2, 9));

        let names: Vec<_> = result
            .sections
            .iter()
            .map(|s| s.section.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Display Tank", "Sump", "ATO", "Frag Tank"]);

        // Axis starts at the ATO item even for the Display Tank section
        assert_eq!(result.axis[0].start, "2023-06-01");
        let display = &result.sections[0].bars[0];
        assert_eq!(display.offset_months, 9);
    }

    #[test]
    fn test_bad_dates_only_drop_that_item() {
        let items = vec![
            TimelineEntry::new("ok", "Skimmer", "2023-06-15", None),
            TimelineEntry::new("bad-start", "Broken", "15/06/2023", None),
            TimelineEntry::new("bad-end", "Broken", "2023-06-15", Some("soon")),
        ];
        let result = layout(&items, ymd(2024, 1, 1));
        assert_eq!(result.bars().count(), 1);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.failures[0].id, "bad-start");
        assert_eq!(result.failures[1].id, "bad-end");
    }

    #[test]
    fn test_empty_input() {
        let now = ymd(2026, 2, 9);
        let result = layout(&[], now);
        assert!(result.is_empty());
        assert_eq!(result.total_months, 3);
        assert_eq!(result.axis[0].label, "Feb 26");

        let sectioned = layout_sections(&[], &["Sump".to_string()], now);
        assert!(sectioned.sections.is_empty());
    }

    #[test]
    fn test_end_before_start_still_one_month() {
        let items = vec![TimelineEntry::new("x", "Odd", "2024-05-10", Some("2024-02-01"))];
        let result = layout(&items, ymd(2024, 6, 1));
        let bar = result.bars().next().unwrap();
        assert_eq!(bar.duration_months, 1);
        assert_eq!(bar.offset_months, 3);
    }
}
