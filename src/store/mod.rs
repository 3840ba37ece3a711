//! Durable storage for the composed report list.
//!
//! The whole list lives under one logical key and is always read and written
//! in full; the strongest guarantee is last-writer-wins on the entire list.

pub mod error;
pub mod json_file;

use crate::report::model::Report;
use crate::store::error::StoreError;
use std::future::Future;
use std::sync::Mutex;
use uuid::Uuid;

/// Capability interface over the persisted report list.
pub trait ReportStore: Send + Sync {
    /// Reads the full stored list; an absent store reads as empty.
    fn read_all(&self) -> impl Future<Output = Result<Vec<Report>, StoreError>> + Send;

    /// Replaces the full stored list.
    fn write_all(&self, reports: &[Report])
        -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes the reports with the given ids and returns the remaining list,
    /// relative order preserved.
    fn delete_by_ids<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> impl Future<Output = Result<Vec<Report>, StoreError>> + Send + 'a
    where
        Self: Sized,
    {
        async move {
            let remaining: Vec<Report> = self
                .read_all()
                .await?
                .into_iter()
                .filter(|report| !ids.contains(&report.report_id))
                .collect();
            self.write_all(&remaining).await?;
            Ok(remaining)
        }
    }
}

/// In-memory store for tests and embedding without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: Mutex<Vec<Report>>,
}

impl ReportStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn write_all(&self, reports: &[Report]) -> Result<(), StoreError> {
        *self.reports.lock().unwrap() = reports.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::series::WeatherVariable;
    use crate::report::compose::compose;
    use crate::report::row::ResolvedRow;
    use chrono::NaiveDate;

    fn sample_report(label: &str) -> Report {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let row = ResolvedRow {
            city_label: Some(label.to_string()),
            latitude: "24.7".to_string(),
            longitude: "46.7".to_string(),
            date_range: (date, date),
        };
        compose(&[row], &[WeatherVariable::Temperature2m], date)
    }

    #[tokio::test]
    async fn prepend_keeps_newest_first() {
        let store = MemoryStore::default();
        let first = sample_report("first");
        let second = sample_report("second");

        let mut stored = store.read_all().await.unwrap();
        stored.insert(0, first.clone());
        store.write_all(&stored).await.unwrap();

        let mut stored = store.read_all().await.unwrap();
        stored.insert(0, second.clone());
        store.write_all(&stored).await.unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all[0].report_id, second.report_id);
        assert_eq!(all[1].report_id, first.report_id);
    }

    #[tokio::test]
    async fn delete_by_ids_preserves_relative_order() {
        let store = MemoryStore::default();
        let reports: Vec<Report> = ["A", "B", "C", "D"]
            .into_iter()
            .map(sample_report)
            .collect();
        store.write_all(&reports).await.unwrap();

        let doomed = [reports[0].report_id, reports[2].report_id];
        let remaining = store.delete_by_ids(&doomed).await.unwrap();

        let labels: Vec<_> = remaining.iter().map(|r| r.cities[0].as_str()).collect();
        assert_eq!(labels, ["B", "D"]);
        // The deletion is persisted, not just returned.
        assert_eq!(store.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleting_unknown_ids_is_a_no_op() {
        let store = MemoryStore::default();
        let reports = vec![sample_report("A")];
        store.write_all(&reports).await.unwrap();
        let remaining = store.delete_by_ids(&[Uuid::new_v4()]).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
