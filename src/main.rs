use clap::Parser;
use payroll_admin::core::session::SessionController;
use payroll_admin::domain::model::DashboardStats;
use payroll_admin::domain::ports::{NotificationSink, PayrollBackend};
use payroll_admin::utils::error::AdminError;
use payroll_admin::utils::format::time_ago;
use payroll_admin::utils::validation::{self, Validate};
use payroll_admin::utils::logger;
use payroll_admin::{
    AdminConfig, AppsScriptClient, CliConfig, Command, ConsoleNotifier, SupabaseClient,
};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入配置：優先使用設定檔，否則讀取環境變數
    let (config, source) = match AdminConfig::load(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting payroll-admin");
    tracing::debug!("Configuration loaded from {}", source);
    if cli.verbose {
        tracing::debug!("Command: {:?}", cli.command);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 命令列參數覆蓋設定檔中的匯入選項
    let mut import_delay = config.import_delay();
    let mut error_report = config.error_report_path().map(PathBuf::from);
    let mut echo_progress = false;
    if let Command::Import {
        error_report: report_override,
        delay_ms,
        quiet,
        ..
    } = &cli.command
    {
        if let Some(delay) = delay_ms {
            if let Err(e) = validation::validate_range("--delay-ms", *delay, 0, 60_000) {
                exit_with(&e);
            }
            import_delay = Duration::from_millis(*delay);
        }
        if let Some(path) = report_override {
            if let Err(e) = validation::validate_path("--error-report", path) {
                exit_with(&e);
            }
            error_report = Some(PathBuf::from(path));
        }
        echo_progress = !quiet;
    }

    let backend = SupabaseClient::new(&config.supabase)?;
    let mut session = SessionController::new(backend, ConsoleNotifier)
        .with_import_delay(import_delay)
        .with_activity_capacity(config.activity_capacity())
        .with_error_report(error_report)
        .with_progress_echo(echo_progress);

    if let Some(url) = config.apps_script_url() {
        session =
            session.with_sheet_refresher(AppsScriptClient::new(url, config.request_timeout())?);
    } else {
        tracing::debug!("Apps Script URL not configured; refresh-sheet is unavailable");
    }

    if let Some((email, password)) = cli.credentials() {
        if let Err(e) = session.login(email, password).await {
            exit_with(&e);
        }
    }

    let result = run_command(&mut session, &cli.command).await;

    print_activity(&session);

    if session.current_user().is_some() {
        let _ = session.logout().await;
    }

    match result {
        Ok(()) => {
            tracing::info!("✅ Done");
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

async fn run_command<B: PayrollBackend, N: NotificationSink>(
    session: &mut SessionController<B, N>,
    command: &Command,
) -> payroll_admin::Result<()> {
    match command {
        Command::Stats => {
            let stats = session.load_stats().await?;
            print_stats(&stats);
        }
        Command::Import { file, .. } => {
            validation::validate_file_extension("file", &file.to_string_lossy(), &["csv", "txt"])?;
            let summary = session.import_file(file).await?;
            println!("{}", summary.headline());
        }
        Command::Recalculate => {
            let result = session.recalculate_benefits().await?;
            println!(
                "{} empleados procesados, {} beneficios creados",
                result.employees_processed, result.benefits_created
            );
        }
        Command::RefreshSheet => {
            session.refresh_sheet_view().await?;
            println!("📤 Solicitud enviada; revisa la hoja para confirmar la actualización");
        }
    }
    Ok(())
}

fn print_stats(stats: &DashboardStats) {
    println!("👥 Empleados activos: {}", stats.total_employees);
    println!("🎁 Entregas de beneficios: {}", stats.total_deliveries);
    println!("📄 Poderes simples: {}", stats.total_powers);
    match &stats.last_sync {
        Some(last) => {
            println!(
                "🔄 Última sincronización: {}",
                time_ago(last.sync_timestamp, chrono::Utc::now())
            );
            println!("   {}", last.status_label());
        }
        None => {
            println!("🔄 Última sincronización: Nunca");
            println!("   No hay sincronizaciones");
        }
    }
}

fn print_activity<B: PayrollBackend, N: NotificationSink>(session: &SessionController<B, N>) {
    if session.activity_log().is_empty() {
        return;
    }
    println!();
    println!("Actividad reciente:");
    for line in session.activity_log().render(chrono::Utc::now()) {
        println!("  {}", line);
    }
}

fn exit_with(e: &AdminError) -> ! {
    tracing::error!(
        "❌ payroll-admin failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Sugerencia: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}
