use crate::core::activity::ActivityLog;
use crate::core::column_mapper;
use crate::core::failure_report::write_failure_report;
use crate::core::importer::BatchImporter;
use crate::core::progress::ProgressReporter;
use crate::core::throttle::{FixedDelay, DEFAULT_IMPORT_DELAY};
use crate::domain::model::{
    ActivityKind, AuthenticatedUser, DashboardStats, ImportSummary, Notification,
    NotificationLevel, RecalculationResult, SheetRefreshOutcome, SyncLogEntry, SyncStatus,
};
use crate::domain::ports::{NotificationSink, PayrollBackend, SheetRefresher};
use crate::utils::error::{AdminError, Result};
use crate::utils::format::format_file_size;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 工作階段的可變狀態
#[derive(Debug, Default)]
pub struct AppState {
    pub current_user: Option<AuthenticatedUser>,
    pub activity_log: ActivityLog,
    pub last_stats: Option<DashboardStats>,
}

/// 管理員工作階段：持有狀態，並對需要登入的操作做權限檢查
pub struct SessionController<B: PayrollBackend, N: NotificationSink> {
    backend: B,
    notifier: N,
    sheet_refresher: Option<Box<dyn SheetRefresher>>,
    import_delay: Duration,
    error_report_path: Option<PathBuf>,
    echo_progress: bool,
    state: AppState,
}

impl<B: PayrollBackend, N: NotificationSink> SessionController<B, N> {
    pub fn new(backend: B, notifier: N) -> Self {
        Self {
            backend,
            notifier,
            sheet_refresher: None,
            import_delay: DEFAULT_IMPORT_DELAY,
            error_report_path: None,
            echo_progress: false,
            state: AppState::default(),
        }
    }

    pub fn with_sheet_refresher(mut self, refresher: impl SheetRefresher + 'static) -> Self {
        self.sheet_refresher = Some(Box::new(refresher));
        self
    }

    pub fn with_import_delay(mut self, delay: Duration) -> Self {
        self.import_delay = delay;
        self
    }

    pub fn with_activity_capacity(mut self, capacity: usize) -> Self {
        self.state.activity_log = ActivityLog::with_capacity(capacity);
        self
    }

    pub fn with_error_report(mut self, path: Option<PathBuf>) -> Self {
        self.error_report_path = path;
        self
    }

    pub fn with_progress_echo(mut self, echo: bool) -> Self {
        self.echo_progress = echo;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&AuthenticatedUser> {
        self.state.current_user.as_ref()
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.state.activity_log
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn notify(&self, level: NotificationLevel, title: &str, message: impl Into<String>) {
        self.notifier.notify(Notification::new(level, title, message));
    }

    fn require_user(&self) -> Result<()> {
        if self.state.current_user.is_none() {
            tracing::warn!("🔒 Operation attempted without an authenticated session");
            self.notify(
                NotificationLevel::Error,
                "Acceso requerido",
                "Inicia sesión para continuar",
            );
            return Err(AdminError::AuthenticationRequired);
        }
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        match self.backend.sign_in(email, password).await {
            Ok(user) => {
                self.notify(
                    NotificationLevel::Success,
                    "Bienvenido",
                    format!("Autenticado como {}", user.email),
                );
                self.state.current_user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                tracing::error!("❌ Login error: {}", e);
                self.notify(NotificationLevel::Error, "Error de Acceso", e.remote_message());
                Err(e)
            }
        }
    }

    pub async fn logout(&mut self) -> Result<()> {
        // 即使遠端登出失敗，本地狀態仍清除
        self.state.current_user = None;
        match self.backend.sign_out().await {
            Ok(()) => {
                self.notify(
                    NotificationLevel::Info,
                    "Sesión cerrada",
                    "Has cerrado sesión correctamente",
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Logout error: {}", e);
                self.notify(NotificationLevel::Error, "Error", "No se pudo cerrar sesión");
                Err(e)
            }
        }
    }

    pub async fn load_stats(&mut self) -> Result<DashboardStats> {
        match self.backend.load_stats().await {
            Ok(stats) => {
                tracing::info!("✅ Stats loaded successfully");
                self.state.last_stats = Some(stats.clone());
                Ok(stats)
            }
            Err(e) => {
                tracing::error!("❌ Error loading stats: {}", e);
                self.notify(
                    NotificationLevel::Error,
                    "Error",
                    "No se pudieron cargar las estadísticas",
                );
                Err(e)
            }
        }
    }

    /// 操作完成後刷新統計；失敗已在 load_stats 內通知
    async fn refresh_stats(&mut self) {
        let _ = self.load_stats().await;
    }

    pub async fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        self.require_user()?;

        let text = match tokio::fs::read(path).await {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                tracing::info!("📄 {} ({})", name, format_file_size(bytes.len() as u64));
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Err(e) => {
                tracing::error!("❌ Error reading {}: {}", path.display(), e);
                self.notify(NotificationLevel::Error, "Error", e.to_string());
                return Err(e.into());
            }
        };

        self.run_import(&text).await
    }

    pub async fn import_csv_text(&mut self, text: &str) -> Result<ImportSummary> {
        self.require_user()?;
        self.run_import(text).await
    }

    async fn run_import(&mut self, text: &str) -> Result<ImportSummary> {
        self.notify(NotificationLevel::Info, "Procesando", "Leyendo archivo CSV...");

        let records = match column_mapper::build_records(text) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("❌ Error processing CSV: {}", e);
                self.notify(NotificationLevel::Error, "Error", e.to_string());
                return Err(e.into());
            }
        };

        self.notify(
            NotificationLevel::Success,
            "Archivo Procesado",
            format!("Se encontraron {} empleados", records.len()),
        );

        let mut reporter = ProgressReporter::new().with_echo(self.echo_progress);
        let summary = {
            let importer =
                BatchImporter::new(&self.backend).with_delay(FixedDelay(self.import_delay));
            importer.run(&records, &mut reporter).await
        };

        if !summary.is_clean() {
            if let Some(path) = &self.error_report_path {
                if let Err(e) = write_failure_report(&summary, path) {
                    tracing::warn!("⚠️ Could not write failure report: {}", e);
                }
            }
        }

        self.state.activity_log.push(
            ActivityKind::Success,
            "Importación de Nómina",
            format!(
                "Se importaron {} empleados con {} errores",
                summary.imported_count, summary.failed_count
            ),
        );

        self.refresh_stats().await;

        if summary.is_clean() {
            self.notify(
                NotificationLevel::Success,
                "Importación Completa",
                format!("{} empleados importados exitosamente", summary.imported_count),
            );
        } else {
            self.notify(
                NotificationLevel::Error,
                "Importación con Errores",
                format!(
                    "{} importados, {} errores",
                    summary.imported_count, summary.failed_count
                ),
            );
        }

        Ok(summary)
    }

    pub async fn recalculate_benefits(&mut self) -> Result<RecalculationResult> {
        self.require_user()?;

        match self.backend.recalculate_benefits().await {
            Ok(result) => {
                tracing::info!(
                    "✅ Benefits recalculated: {} employees, {} benefits",
                    result.employees_processed,
                    result.benefits_created
                );
                self.state.activity_log.push(
                    ActivityKind::Success,
                    "Beneficios Recalculados",
                    format!(
                        "{} empleados procesados, {} beneficios creados",
                        result.employees_processed, result.benefits_created
                    ),
                );
                self.notify(
                    NotificationLevel::Success,
                    "Éxito",
                    format!(
                        "Recalculados: {} empleados, {} beneficios",
                        result.employees_processed, result.benefits_created
                    ),
                );
                self.refresh_stats().await;
                Ok(result)
            }
            Err(e) => {
                tracing::error!("❌ Error recalculating benefits: {}", e);
                self.state.activity_log.push(
                    ActivityKind::Error,
                    "Error al Recalcular",
                    e.remote_message(),
                );
                self.notify(NotificationLevel::Error, "Error", e.remote_message());
                Err(e)
            }
        }
    }

    /// 送出試算表更新請求。
    ///
    /// `RequestSent` 只代表請求已送達，不代表試算表已更新。
    pub async fn refresh_sheet_view(&mut self) -> Result<SheetRefreshOutcome> {
        self.require_user()?;

        let outcome = match &self.sheet_refresher {
            Some(refresher) => refresher.refresh_sheet_view().await,
            None => {
                let e = AdminError::config("Apps Script URL no configurada");
                tracing::error!("❌ Error updating sheet view: {}", e);
                self.state.activity_log.push(
                    ActivityKind::Error,
                    "Error al Actualizar Vista",
                    e.to_string(),
                );
                self.notify(NotificationLevel::Error, "Error", e.to_string());
                return Err(e);
            }
        };

        match outcome {
            SheetRefreshOutcome::RequestSent { status } => {
                self.state.activity_log.push(
                    ActivityKind::Info,
                    "Vista Actualizada",
                    "Solicitud de sincronización enviada a Google Sheets",
                );
                self.notify(
                    NotificationLevel::Info,
                    "Solicitud Enviada",
                    "Actualización de la vista de nómina solicitada a Google Sheets",
                );

                let entry = SyncLogEntry::sheet_update(SyncStatus::Success);
                if let Err(e) = self.backend.append_sync_log(&entry).await {
                    tracing::warn!("⚠️ Could not append sync log: {}", e);
                }

                self.refresh_stats().await;
                Ok(SheetRefreshOutcome::RequestSent { status })
            }
            SheetRefreshOutcome::RequestFailed(message) => {
                self.state.activity_log.push(
                    ActivityKind::Error,
                    "Error al Actualizar Vista",
                    message.clone(),
                );
                self.notify(NotificationLevel::Error, "Error", message.clone());
                Err(AdminError::remote("sheet view refresh", None, message))
            }
        }
    }
}
