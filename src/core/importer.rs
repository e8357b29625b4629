use crate::core::throttle::{self, FixedDelay};
use crate::domain::model::{
    EmployeeRecord, ImportFailure, ImportOutcome, ImportSummary, ProgressEvent, RecordFinished,
};
use crate::domain::ports::{DelayStrategy, EmployeeGateway, ProgressSink};

/// 逐筆呼叫遠端 upsert 的批次匯入器。
///
/// 一次只有一個請求在途中；單筆失敗只記錄在摘要，不會中斷整批。
pub struct BatchImporter<G: EmployeeGateway> {
    gateway: G,
    delay: Box<dyn DelayStrategy>,
}

impl<G: EmployeeGateway> BatchImporter<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            delay: Box::new(FixedDelay::default()),
        }
    }

    pub fn with_delay(mut self, delay: impl DelayStrategy + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn run(&self, records: &[EmployeeRecord], sink: &mut dyn ProgressSink) -> ImportSummary {
        let total = records.len();
        let mut summary = ImportSummary::new(total);

        tracing::info!("🚀 Importing {} employees", total);

        for (index, record) in records.iter().enumerate() {
            sink.on_progress(&ProgressEvent {
                index,
                total,
                display_name: record.display_name(),
                imported_count: summary.imported_count,
                failed_count: summary.failed_count,
            });

            let outcome = match self.gateway.upsert_employee(record).await {
                Ok(()) => {
                    summary.record_success();
                    ImportOutcome::Imported
                }
                Err(e) => {
                    tracing::error!("❌ Error importing {}: {}", record.identifier, e);
                    let reason = e.remote_message();
                    summary.record_failure(ImportFailure {
                        identifier: record.identifier.clone(),
                        first_name: record.first_name.clone(),
                        last_name: record.last_name.clone(),
                        reason: reason.clone(),
                    });
                    ImportOutcome::Failed(reason)
                }
            };

            sink.on_record_finished(&RecordFinished {
                index,
                identifier: record.identifier.clone(),
                outcome,
            });

            throttle::pause(self.delay.as_ref(), index).await;
        }

        tracing::info!(
            "✅ Import finished: {} imported, {} failed",
            summary.imported_count,
            summary.failed_count
        );

        sink.on_finished(&summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::throttle::NoDelay;
    use crate::utils::error::{AdminError, Result};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct MockGateway {
        failing: HashSet<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockGateway {
        fn failing_on(ids: &[&str]) -> Self {
            Self {
                failing: ids.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmployeeGateway for MockGateway {
        async fn upsert_employee(&self, record: &EmployeeRecord) -> Result<()> {
            self.calls.lock().unwrap().push(record.identifier.clone());
            if self.failing.contains(&record.identifier) {
                return Err(AdminError::remote(
                    "import_employee",
                    Some(400),
                    "cedula duplicada",
                ));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        progress: Vec<ProgressEvent>,
        finished: Vec<RecordFinished>,
        summaries: Vec<ImportSummary>,
    }

    impl ProgressSink for RecordingSink {
        fn on_progress(&mut self, event: &ProgressEvent) {
            self.progress.push(event.clone());
        }

        fn on_record_finished(&mut self, event: &RecordFinished) {
            self.finished.push(event.clone());
        }

        fn on_finished(&mut self, summary: &ImportSummary) {
            self.summaries.push(summary.clone());
        }
    }

    struct CountingDelay(Arc<Mutex<Vec<usize>>>);

    impl DelayStrategy for CountingDelay {
        fn delay_for(&self, index: usize) -> Duration {
            self.0.lock().unwrap().push(index);
            Duration::ZERO
        }
    }

    fn employee(id: &str, first: &str, last: &str) -> EmployeeRecord {
        EmployeeRecord {
            identifier: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: None,
            contract_type: "indefinido".to_string(),
            start_date: None,
        }
    }

    fn three_employees() -> Vec<EmployeeRecord> {
        vec![
            employee("11111111", "Ana", "Pérez"),
            employee("22222222", "Luis", "Rojas"),
            employee("33333333", "Eva", "Díaz"),
        ]
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_batch() {
        let gateway = MockGateway::failing_on(&["22222222"]);
        let importer = BatchImporter::new(gateway.clone()).with_delay(NoDelay);
        let mut sink = RecordingSink::default();

        let summary = importer.run(&three_employees(), &mut sink).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.imported_count, 2);
        assert_eq!(summary.failed_count, 1);
        assert_eq!(
            summary.failure_messages,
            vec!["22222222 - Luis Rojas: cedula duplicada"]
        );
        assert_eq!(gateway.calls(), vec!["11111111", "22222222", "33333333"]);
        assert_eq!(
            sink.finished[1].outcome,
            ImportOutcome::Failed("cedula duplicada".to_string())
        );
    }

    #[tokio::test]
    async fn test_total_failure_is_reported_not_raised() {
        let gateway = MockGateway::failing_on(&["11111111", "22222222", "33333333"]);
        let importer = BatchImporter::new(gateway).with_delay(NoDelay);
        let mut sink = RecordingSink::default();

        let summary = importer.run(&three_employees(), &mut sink).await;

        assert_eq!(summary.failed_count, summary.total);
        assert_eq!(summary.imported_count, 0);
        assert_eq!(summary.failure_messages.len(), 3);
        assert_eq!(sink.summaries, vec![summary]);
    }

    #[tokio::test]
    async fn test_progress_events_are_ordered_without_gaps() {
        let gateway = MockGateway::failing_on(&["22222222"]);
        let importer = BatchImporter::new(gateway).with_delay(NoDelay);
        let mut sink = RecordingSink::default();

        importer.run(&three_employees(), &mut sink).await;

        let indexes: Vec<usize> = sink.progress.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert!(sink.progress.iter().all(|e| e.total == 3));
        assert_eq!(sink.progress[1].display_name, "Luis Rojas");
        // 第三筆開始時已累計一成功一失敗
        assert_eq!(sink.progress[2].imported_count, 1);
        assert_eq!(sink.progress[2].failed_count, 1);
    }

    #[tokio::test]
    async fn test_delay_applied_after_every_record() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let importer = BatchImporter::new(MockGateway::default())
            .with_delay(CountingDelay(seen.clone()));
        let mut sink = RecordingSink::default();

        importer.run(&three_employees(), &mut sink).await;

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_counts_always_add_up() {
        for failing in [vec![], vec!["11111111"], vec!["11111111", "33333333"]] {
            let importer =
                BatchImporter::new(MockGateway::failing_on(&failing)).with_delay(NoDelay);
            let mut sink = RecordingSink::default();
            let summary = importer.run(&three_employees(), &mut sink).await;

            assert_eq!(summary.imported_count + summary.failed_count, summary.total);
            assert_eq!(summary.failed_count, failing.len());
        }
    }

    #[tokio::test]
    async fn test_empty_batch_produces_empty_summary() {
        let importer = BatchImporter::new(MockGateway::default()).with_delay(NoDelay);
        let mut sink = RecordingSink::default();

        let summary = importer.run(&[], &mut sink).await;

        assert_eq!(summary, ImportSummary::new(0));
        assert!(sink.progress.is_empty());
        assert_eq!(sink.summaries.len(), 1);
    }
}
