use httpmock::prelude::*;
use httpmock::Method::HEAD;
use payroll_admin::config::toml_config::SupabaseConfig;
use payroll_admin::domain::model::{ActivityKind, SheetRefreshOutcome};
use payroll_admin::domain::ports::{SheetRefresher, StatsGateway};
use payroll_admin::{
    AdminConfig, AdminError, AppsScriptClient, MemoryNotifier, SessionController, SupabaseClient,
};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const ANON_KEY: &str = "anon-key";

fn supabase(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        url: server.base_url(),
        anon_key: ANON_KEY.to_string(),
        timeout_seconds: Some(5),
    })
    .unwrap()
}

fn mock_sign_in(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/auth/v1/token")
            .query_param("grant_type", "password");
        then.status(200).json_body(serde_json::json!({
            "access_token": "user-token",
            "user": { "id": "8f1c", "email": "admin@empresa.cl" }
        }));
    });
}

fn mock_counts(server: &MockServer) {
    server.mock(|when, then| {
        when.method(HEAD)
            .path("/rest/v1/employees")
            .query_param("activo", "eq.true")
            .header("prefer", "count=exact");
        then.status(200).header("Content-Range", "0-24/120");
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/rest/v1/benefit_deliveries");
        then.status(200).header("Content-Range", "0-24/340");
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/rest/v1/poder_simple");
        then.status(200).header("Content-Range", "*/0");
    });
}

async fn signed_in_session(server: &MockServer, notifier: MemoryNotifier) -> SessionController<SupabaseClient, MemoryNotifier> {
    mock_sign_in(server);
    let mut session =
        SessionController::new(supabase(server), notifier).with_import_delay(Duration::ZERO);
    session.login("admin@empresa.cl", "secreta").await.unwrap();
    session
}

#[tokio::test]
async fn test_load_stats_reads_counts_and_last_sync() {
    let server = MockServer::start();
    mock_counts(&server);
    let last_sync = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/sync_logs")
            .query_param("order", "sync_timestamp.desc")
            .query_param("limit", "1");
        then.status(200).json_body(serde_json::json!([
            { "sync_timestamp": "2024-05-02T10:15:00+00:00", "status": "success" }
        ]));
    });

    let stats = supabase(&server).load_stats().await.unwrap();

    last_sync.assert();
    assert_eq!(stats.total_employees, 120);
    assert_eq!(stats.total_deliveries, 340);
    assert_eq!(stats.total_powers, 0);
    let last = stats.last_sync.unwrap();
    assert_eq!(last.status, "success");
    assert_eq!(last.status_label(), "✅ Sistema actualizado");
}

#[tokio::test]
async fn test_load_stats_tolerates_missing_sync_log() {
    let server = MockServer::start();
    mock_counts(&server);
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/sync_logs");
        then.status(404).json_body(serde_json::json!({ "message": "relation does not exist" }));
    });

    let stats = supabase(&server).load_stats().await.unwrap();
    assert_eq!(stats.total_employees, 120);
    assert!(stats.last_sync.is_none());
}

#[tokio::test]
async fn test_login_failure_surfaces_remote_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/auth/v1/token");
        then.status(400).json_body(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }));
    });

    let notifier = MemoryNotifier::new();
    let mut session = SessionController::new(supabase(&server), notifier.clone());

    let result = session.login("admin@empresa.cl", "mala").await;

    assert!(matches!(result, Err(AdminError::AuthError { .. })));
    assert!(session.current_user().is_none());
    let notification = &notifier.notifications()[0];
    assert_eq!(notification.title, "Error de Acceso");
    assert_eq!(notification.message, "Invalid login credentials");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let server = MockServer::start();
    let logout = server.mock(|when, then| {
        when.method(POST)
            .path("/auth/v1/logout")
            .header("authorization", "Bearer user-token");
        then.status(204);
    });

    let mut session = signed_in_session(&server, MemoryNotifier::new()).await;
    assert!(session.backend().is_signed_in().await);

    assert_ok!(session.logout().await);

    logout.assert();
    assert!(!session.backend().is_signed_in().await);
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn test_recalculate_benefits_success() {
    let server = MockServer::start();
    mock_counts(&server);
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/sync_logs");
        then.status(200).json_body(serde_json::json!([]));
    });
    let recalc = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/rpc/recalculate_all_employee_benefits")
            .header("authorization", "Bearer user-token");
        then.status(200).json_body(serde_json::json!({
            "empleados_procesados": 118,
            "beneficios_creados": 236
        }));
    });

    let notifier = MemoryNotifier::new();
    let mut session = signed_in_session(&server, notifier.clone()).await;

    let result = session.recalculate_benefits().await.unwrap();

    recalc.assert();
    assert_eq!(result.employees_processed, 118);
    assert_eq!(result.benefits_created, 236);

    let entry = session.activity_log().latest().unwrap();
    assert_eq!(entry.kind, ActivityKind::Success);
    assert_eq!(entry.description, "118 empleados procesados, 236 beneficios creados");
    assert_eq!(
        notifier.notifications().last().unwrap().message,
        "Recalculados: 118 empleados, 236 beneficios"
    );
}

#[tokio::test]
async fn test_recalculate_benefits_failure_is_not_retried() {
    let server = MockServer::start();
    let recalc = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/rpc/recalculate_all_employee_benefits");
        then.status(500).json_body(serde_json::json!({
            "code": "42883",
            "message": "function recalculate_all_employee_benefits() does not exist"
        }));
    });

    let mut session = signed_in_session(&server, MemoryNotifier::new()).await;

    let result = session.recalculate_benefits().await;

    assert_err!(&result);
    recalc.assert_hits(1);
    let entry = session.activity_log().latest().unwrap();
    assert_eq!(entry.title, "Error al Recalcular");
    assert_eq!(
        entry.description,
        "function recalculate_all_employee_benefits() does not exist"
    );
}

#[tokio::test]
async fn test_sheet_refresh_request_sent_even_on_error_status() {
    let server = MockServer::start();
    let apps_script = server.mock(|when, then| {
        when.method(GET)
            .path("/macros/s/deploy/exec")
            .query_param("action", "updateview");
        then.status(500).body("<html>Script error</html>");
    });

    let client = AppsScriptClient::new(&server.url("/macros/s/deploy/exec"), Duration::from_secs(5)).unwrap();
    let outcome = client.refresh_sheet_view().await;

    apps_script.assert();
    assert_eq!(outcome, SheetRefreshOutcome::RequestSent { status: Some(500) });
}

#[tokio::test]
async fn test_sheet_refresh_appends_sync_log() {
    let server = MockServer::start();
    mock_counts(&server);
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/sync_logs");
        then.status(200).json_body(serde_json::json!([]));
    });
    let apps_script = server.mock(|when, then| {
        when.method(GET).path("/exec").query_param("action", "updateview");
        then.status(200);
    });
    let sync_log = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/sync_logs")
            .header("prefer", "return=minimal")
            .json_body_partial(r#"{"sync_type":"sheet_update","status":"success"}"#);
        then.status(201);
    });

    let refresher = AppsScriptClient::new(&server.url("/exec"), Duration::from_secs(5)).unwrap();
    let mut session = signed_in_session(&server, MemoryNotifier::new())
        .await
        .with_sheet_refresher(refresher);

    let outcome = session.refresh_sheet_view().await.unwrap();

    apps_script.assert();
    sync_log.assert();
    assert!(matches!(outcome, SheetRefreshOutcome::RequestSent { .. }));
    assert_eq!(session.activity_log().latest().unwrap().kind, ActivityKind::Info);
}

#[tokio::test]
async fn test_sheet_refresh_network_failure() {
    let server = MockServer::start();
    let sync_log = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/sync_logs");
        then.status(201);
    });

    // 沒有服務在監聽的埠
    let refresher = AppsScriptClient::new("http://127.0.0.1:1/exec", Duration::from_secs(2)).unwrap();
    let mut session = signed_in_session(&server, MemoryNotifier::new())
        .await
        .with_sheet_refresher(refresher);

    let result = session.refresh_sheet_view().await;

    assert!(matches!(result, Err(AdminError::Remote { .. })));
    sync_log.assert_hits(0);
    let entry = session.activity_log().latest().unwrap();
    assert_eq!(entry.kind, ActivityKind::Error);
    assert_eq!(entry.title, "Error al Actualizar Vista");
}

#[tokio::test]
async fn test_config_drives_client_construction() {
    let server = MockServer::start();
    let toml_content = format!(
        r#"
[supabase]
url = "{}"
anon_key = "{}"
timeout_seconds = 5

[apps_script]
url = "YOUR_APPS_SCRIPT_DEPLOYMENT_URL_HERE"
"#,
        server.base_url(),
        ANON_KEY
    );

    let config = AdminConfig::from_toml_str(&toml_content).unwrap();
    assert_ok!(payroll_admin::utils::validation::Validate::validate(&config));
    assert!(config.apps_script_url().is_none());

    let mut session = SessionController::new(
        SupabaseClient::new(&config.supabase).unwrap(),
        MemoryNotifier::new(),
    );
    mock_sign_in(&server);
    session.login("admin@empresa.cl", "secreta").await.unwrap();

    let result = session.refresh_sheet_view().await;
    assert!(matches!(result, Err(AdminError::ConfigError { .. })));
}
