use crate::domain::model::{ImportOutcome, ImportSummary, ProgressEvent, RecordFinished};
use crate::domain::ports::ProgressSink;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub title: String,
    pub percent: f64,
    pub imported_count: usize,
    pub failed_count: usize,
    pub description: String,
    pub error_list: Vec<String>,
}

impl Default for ProgressView {
    fn default() -> Self {
        Self {
            title: "Importando Empleados".to_string(),
            percent: 0.0,
            imported_count: 0,
            failed_count: 0,
            description: String::new(),
            error_list: Vec::new(),
        }
    }
}

/// 將匯入事件投影成進度畫面；不做任何決策
#[derive(Debug, Default)]
pub struct ProgressReporter {
    view: ProgressView,
    echo: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次更新時同步輸出到 stdout
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn view(&self) -> &ProgressView {
        &self.view
    }

    pub fn render_line(&self) -> String {
        format!(
            "[{:>5.1}%] {} (✅ {} / ❌ {})",
            self.view.percent, self.view.description, self.view.imported_count, self.view.failed_count
        )
    }
}

impl ProgressSink for ProgressReporter {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.view.percent = event.percent();
        self.view.imported_count = event.imported_count;
        self.view.failed_count = event.failed_count;
        self.view.description = format!(
            "Importando empleado {} de {}: {}",
            event.index + 1,
            event.total,
            event.display_name
        );

        if self.echo {
            println!("{}", self.render_line());
        }
    }

    fn on_record_finished(&mut self, event: &RecordFinished) {
        match event.outcome {
            ImportOutcome::Imported => self.view.imported_count += 1,
            ImportOutcome::Failed(_) => self.view.failed_count += 1,
        }
    }

    fn on_finished(&mut self, summary: &ImportSummary) {
        self.view.title = "Importación Completa".to_string();
        self.view.imported_count = summary.imported_count;
        self.view.failed_count = summary.failed_count;
        self.view.description = summary.headline();
        self.view.error_list = summary.failure_messages.clone();

        if self.echo {
            println!("{}", self.view.description);
            for message in &self.view.error_list {
                println!("  ❌ {}", message);
            }
        }
    }
}
