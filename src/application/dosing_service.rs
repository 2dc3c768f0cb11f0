// Dosing service - Dose log, trailing-day summary and trace batches
use crate::application::dosing_repository::DosingRepository;
use crate::domain::dosing::{
    daily_volumes, parse_timestamp, summarize_last_day, DailyVolume, DosingEvent, DosingSummary,
    TraceBatch, TraceElement, TraceTemplate, MANUAL_PUMP,
};
use crate::domain::error::{AnalysisError, ItemFailure};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct DosingLog {
    /// Newest first.
    pub events: Vec<DosingEvent>,
    pub failures: Vec<ItemFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceBatchView {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub containers: u32,
    pub elements: Vec<TraceElement>,
    pub total_volume: f64,
    pub days: i64,
    /// Combined daily volume of every element in the batch.
    pub ml_per_day: f64,
    /// Share of the batch's days elapsed by today, in `[0, 1]`.
    pub progress: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceBatches {
    pub batches: Vec<TraceBatchView>,
    pub failures: Vec<ItemFailure>,
}

#[derive(Clone)]
pub struct DosingService {
    repository: Arc<dyn DosingRepository>,
    batches: Vec<TraceBatch>,
    templates: Vec<TraceTemplate>,
}

impl DosingService {
    pub fn new(
        repository: Arc<dyn DosingRepository>,
        batches: Vec<TraceBatch>,
        templates: Vec<TraceTemplate>,
    ) -> Self {
        Self {
            repository,
            batches,
            templates,
        }
    }

    /// Doses within `from..=to` (by calendar day), newest first. Entries whose
    /// timestamp cannot be read are reported instead of dropped.
    pub async fn events(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<DosingLog> {
        let mut failures = Vec::new();
        let mut timed = Vec::new();
        for event in self.repository.list_events().await? {
            match event.at() {
                Ok(at) => timed.push((at, event)),
                Err(e) => {
                    tracing::warn!("Dose {} has an unreadable timestamp: {}", event.id, e);
                    failures.push(ItemFailure::new(&event.id, &e));
                }
            }
        }

        timed.retain(|(at, _)| {
            from.is_none_or(|from| at.date() >= from) && to.is_none_or(|to| at.date() <= to)
        });
        timed.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(DosingLog {
            events: timed.into_iter().map(|(_, event)| event).collect(),
            failures,
        })
    }

    /// Record a dose; an empty pump name means it was added by hand.
    pub async fn log(&self, mut event: DosingEvent) -> anyhow::Result<DosingEvent> {
        validate(&event)?;
        if event.pump.trim().is_empty() {
            event.pump = MANUAL_PUMP.to_string();
        }
        event.id = self.repository.next_id().await?;
        tracing::info!(
            "Logging {} mL of {} via {}",
            event.volume,
            event.chemical,
            event.pump
        );
        self.repository.insert_event(event.clone()).await?;
        Ok(event)
    }

    pub async fn summary(&self, now: NaiveDateTime) -> anyhow::Result<Vec<DosingSummary>> {
        let events = self.repository.list_events().await?;
        Ok(summarize_last_day(&readable(&events), now))
    }

    /// Per-chemical totals for each of the `days` days before `end`, plus `end` itself.
    pub async fn daily(&self, end: NaiveDate, days: u32) -> anyhow::Result<Vec<DailyVolume>> {
        let start = end.checked_sub_days(Days::new(days.into())).ok_or_else(|| {
            AnalysisError::Validation(format!("{} days before {} is out of range", days, end))
        })?;
        let events = self.repository.list_events().await?;
        Ok(daily_volumes(&readable(&events), start, end))
    }

    pub fn batches(&self, today: NaiveDate) -> TraceBatches {
        let mut failures = Vec::new();
        let batches = self
            .batches
            .iter()
            .filter_map(|batch| match batch.dates() {
                Ok((start, end)) => Some(batch_view(batch, start, end, today)),
                Err(e) => {
                    failures.push(ItemFailure::new(&batch.id, &e));
                    None
                }
            })
            .collect();
        TraceBatches { batches, failures }
    }

    pub fn templates(&self) -> &[TraceTemplate] {
        &self.templates
    }
}

fn readable(events: &[DosingEvent]) -> Vec<(NaiveDateTime, &DosingEvent)> {
    events
        .iter()
        .filter_map(|e| e.at().ok().map(|at| (at, e)))
        .collect()
}

fn batch_view(
    batch: &TraceBatch,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> TraceBatchView {
    let days = (end - start).num_days();
    let elapsed = (today - start).num_days().clamp(0, days);
    TraceBatchView {
        id: batch.id.clone(),
        name: batch.name.clone(),
        start_date: batch.start_date.clone(),
        end_date: batch.end_date.clone(),
        containers: batch.containers,
        elements: batch.elements.clone(),
        total_volume: batch.total_volume,
        days,
        ml_per_day: batch.elements.iter().map(|e| e.ml_per_day).sum(),
        progress: if days == 0 { 1.0 } else { elapsed as f64 / days as f64 },
        active: start <= today && today <= end,
    }
}

fn validate(event: &DosingEvent) -> Result<(), AnalysisError> {
    if event.chemical.trim().is_empty() {
        return Err(AnalysisError::Validation("chemical is required".to_string()));
    }
    if !event.volume.is_finite() || event.volume <= 0.0 {
        return Err(AnalysisError::Validation(format!(
            "volume must be positive, got {}",
            event.volume
        )));
    }
    parse_timestamp(&event.timestamp).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_repository::InMemoryDosingLog;

    fn dose(id: &str, timestamp: &str, pump: &str, chemical: &str, volume: f64) -> DosingEvent {
        DosingEvent {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
            pump: pump.to_string(),
            chemical: chemical.to_string(),
            chemical_sub: None,
            volume,
            remaining: None,
            notes: String::new(),
        }
    }

    fn batch(start: &str, end: &str) -> TraceBatch {
        TraceBatch {
            id: "b1".to_string(),
            name: "RZ - Monthly".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            containers: 2,
            elements: vec![
                TraceElement {
                    name: "IODINE".to_string(),
                    color: String::new(),
                    ml_per_day: 0.25,
                },
                TraceElement {
                    name: "MANGANESE".to_string(),
                    color: String::new(),
                    ml_per_day: 0.75,
                },
            ],
            total_volume: 1920.0,
        }
    }

    fn service() -> DosingService {
        let log = InMemoryDosingLog::new(vec![
            dose("1", "2026-02-08T21:10:10", "PUMP 2", "RZ Part A", 1.0),
            dose("2", "2026-02-09T12:00:00", "MANUAL", "Nitrate", 0.8),
            dose("3", "last tuesday", "PUMP 2", "RZ Part A", 1.0),
            dose("4", "2026-02-08T22:10:10", "PUMP 2", "RZ Part A", 1.0),
            dose("5", "2026-02-01T22:10:10", "PUMP 1", "Alkalinity", 0.9),
        ]);
        DosingService::new(Arc::new(log), vec![batch("Jan 17, 2026", "Feb 26, 2026")], vec![])
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_events_newest_first_with_failures() {
        let log = service().events(None, None).await.unwrap();
        let ids: Vec<_> = log.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "1", "5"]);
        assert_eq!(log.failures.len(), 1);
        assert_eq!(log.failures[0].id, "3");

        let ranged = service()
            .events(Some(date("2026-02-08")), Some(date("2026-02-08")))
            .await
            .unwrap();
        assert_eq!(ranged.events.len(), 2);
    }

    #[tokio::test]
    async fn test_log_manual_dose() {
        let service = service();
        let logged = service
            .log(dose("", "2026-02-09T18:30:00", "", "Magnesium", 2.5))
            .await
            .unwrap();
        assert_eq!(logged.id, "6");
        assert!(logged.is_manual());

        let now = parse_timestamp("2026-02-09T19:00:00").unwrap();
        let summary = service.summary(now).await.unwrap();
        let chemicals: Vec<_> = summary.iter().map(|s| s.chemical.as_str()).collect();
        assert_eq!(chemicals, vec!["RZ Part A", "Magnesium", "Nitrate"]);
        assert_eq!(summary[0].volume, 2.0);
    }

    #[tokio::test]
    async fn test_log_rejects_bad_doses() {
        let service = service();
        let zero = service.log(dose("", "2026-02-09T18:30:00", "", "Nitrate", 0.0)).await;
        assert!(zero.is_err());
        let nameless = service.log(dose("", "2026-02-09T18:30:00", "", " ", 1.0)).await;
        assert!(nameless.is_err());
        let undated = service.log(dose("", "tonight", "", "Nitrate", 1.0)).await;
        let err = undated.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::DateParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_daily_window_is_inclusive() {
        let days = service().daily(date("2026-02-09"), 30).await.unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].date, "Jan 10");
        assert_eq!(days[30].date, "Feb 9");
        assert_eq!(days[29].volumes["RZ Part A"], 2.0);
        assert_eq!(days[22].volumes["Alkalinity"], 0.9);
        assert_eq!(days[30].volumes["Nitrate"], 0.8);
    }

    #[test]
    fn test_batch_progress() {
        let view = service().batches(date("2026-02-06"));
        let batch = &view.batches[0];
        assert_eq!(batch.days, 40);
        assert_eq!(batch.progress, 0.5);
        assert_eq!(batch.ml_per_day, 1.0);
        assert!(batch.active);

        let finished = service().batches(date("2026-03-10"));
        assert_eq!(finished.batches[0].progress, 1.0);
        assert!(!finished.batches[0].active);
    }

    #[test]
    fn test_batch_with_bad_dates_is_reported() {
        let service = DosingService::new(
            Arc::new(InMemoryDosingLog::new(vec![])),
            vec![batch("Feb 26, 2026", "Jan 17, 2026")],
            vec![],
        );
        let view = service.batches(date("2026-02-06"));
        assert!(view.batches.is_empty());
        assert_eq!(view.failures[0].id, "b1");
    }
}
