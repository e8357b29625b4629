use crate::domain::model::{
    AuthenticatedUser, DashboardStats, EmployeeRecord, ImportSummary, Notification,
    ProgressEvent, RecalculationResult, RecordFinished, SheetRefreshOutcome, SyncLogEntry,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser>;
    async fn sign_out(&self) -> Result<()>;
}

/// `import_employee` RPC：依 cédula 新增或更新
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    async fn upsert_employee(&self, record: &EmployeeRecord) -> Result<()>;
}

#[async_trait]
pub trait BenefitsGateway: Send + Sync {
    async fn recalculate_benefits(&self) -> Result<RecalculationResult>;
}

#[async_trait]
pub trait StatsGateway: Send + Sync {
    async fn load_stats(&self) -> Result<DashboardStats>;
}

#[async_trait]
pub trait SyncLogGateway: Send + Sync {
    async fn append_sync_log(&self, entry: &SyncLogEntry) -> Result<()>;
}

/// 後端平台提供的全部能力
pub trait PayrollBackend:
    AuthGateway + EmployeeGateway + BenefitsGateway + StatsGateway + SyncLogGateway
{
}

impl<T> PayrollBackend for T where
    T: AuthGateway + EmployeeGateway + BenefitsGateway + StatsGateway + SyncLogGateway
{
}

#[async_trait]
pub trait SheetRefresher: Send + Sync {
    async fn refresh_sheet_view(&self) -> SheetRefreshOutcome;
}

pub trait ProgressSink: Send {
    fn on_progress(&mut self, event: &ProgressEvent);

    fn on_record_finished(&mut self, _event: &RecordFinished) {}

    fn on_finished(&mut self, _summary: &ImportSummary) {}
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 每筆記錄之後的等待時間；測試時可注入零延遲
pub trait DelayStrategy: Send + Sync {
    fn delay_for(&self, index: usize) -> Duration;
}

#[async_trait]
impl<'a, T: EmployeeGateway + ?Sized> EmployeeGateway for &'a T {
    async fn upsert_employee(&self, record: &EmployeeRecord) -> Result<()> {
        (**self).upsert_employee(record).await
    }
}
