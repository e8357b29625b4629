use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTRACT_TYPE: &str = "indefinido";

/// 一筆待匯入的員工資料；必填欄位保證非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub contract_type: String,
    pub start_date: Option<String>,
}

impl EmployeeRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub reason: String,
}

impl ImportFailure {
    pub fn message(&self) -> String {
        format!(
            "{} - {} {}: {}",
            self.identifier, self.first_name, self.last_name, self.reason
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub imported_count: usize,
    pub failed_count: usize,
    pub failure_messages: Vec<String>,
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.imported_count += 1;
    }

    pub fn record_failure(&mut self, failure: ImportFailure) {
        self.failed_count += 1;
        self.failure_messages.push(failure.message());
        self.failures.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.failed_count == 0
    }

    pub fn headline(&self) -> String {
        format!(
            "Proceso finalizado. {} empleados importados, {} errores.",
            self.imported_count, self.failed_count
        )
    }
}

/// 每筆記錄開始處理前發出一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub index: usize,
    pub total: usize,
    pub display_name: String,
    pub imported_count: usize,
    pub failed_count: usize,
}

impl ProgressEvent {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.index + 1) as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFinished {
    pub index: usize,
    pub identifier: String,
    pub outcome: ImportOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RecalculationResult {
    #[serde(rename = "empleados_procesados", default)]
    pub employees_processed: u64,
    #[serde(rename = "beneficios_creados", default)]
    pub benefits_created: u64,
}

/// Apps Script 以 no-cors 呼叫，無法判斷遠端是否真的完成
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRefreshOutcome {
    RequestSent { status: Option<u16> },
    RequestFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncLogEntry {
    pub sync_type: String,
    pub status: SyncStatus,
    pub sync_timestamp: DateTime<Utc>,
}

impl SyncLogEntry {
    pub fn sheet_update(status: SyncStatus) -> Self {
        Self {
            sync_type: "sheet_update".to_string(),
            status,
            sync_timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LastSync {
    pub sync_timestamp: DateTime<Utc>,
    pub status: String,
}

impl LastSync {
    pub fn status_label(&self) -> &'static str {
        if self.status == "success" {
            "✅ Sistema actualizado"
        } else {
            "⚠️ Error en última sincronización"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub total_deliveries: u64,
    pub total_powers: u64,
    pub last_sync: Option<LastSync>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
