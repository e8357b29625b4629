use crate::config::toml_config::SupabaseConfig;
use crate::domain::model::{
    AuthenticatedUser, DashboardStats, EmployeeRecord, LastSync, RecalculationResult,
    SyncLogEntry,
};
use crate::domain::ports::{
    AuthGateway, BenefitsGateway, EmployeeGateway, StatsGateway, SyncLogGateway,
};
use crate::utils::error::{AdminError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

pub const IMPORT_EMPLOYEE_RPC: &str = "import_employee";
pub const RECALCULATE_BENEFITS_RPC: &str = "recalculate_all_employee_benefits";

#[derive(Debug, Serialize)]
struct ImportEmployeeParams<'a> {
    p_cedula: &'a str,
    p_nombre: &'a str,
    p_apellido: &'a str,
    p_cargo: Option<&'a str>,
    p_tipo_contrato: &'a str,
    p_fecha_ingreso: Option<&'a str>,
}

impl<'a> From<&'a EmployeeRecord> for ImportEmployeeParams<'a> {
    fn from(record: &'a EmployeeRecord) -> Self {
        Self {
            p_cedula: &record.identifier,
            p_nombre: &record.first_name,
            p_apellido: &record.last_name,
            p_cargo: record.role.as_deref(),
            p_tipo_contrato: &record.contract_type,
            p_fecha_ingreso: record.start_date.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthenticatedUser,
}

/// Supabase REST (PostgREST) 與 GoTrue 的精簡客戶端
pub struct SupabaseClient {
    client: Client,
    base_url: Url,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.url)?,
            anon_key: config.anon_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    pub async fn is_signed_in(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let token = self
            .access_token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());

        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn rpc(&self, name: &str, params: &impl Serialize) -> Result<Response> {
        let url = self.endpoint(&format!("/rest/v1/rpc/{}", name))?;
        tracing::debug!("Calling RPC {}", name);

        let response = self.request(Method::POST, url).await.json(params).send().await?;
        ensure_success(name, response).await
    }

    /// 以 `Prefer: count=exact` 的 HEAD 請求取得資料表筆數
    async fn count(&self, table: &str, filters: &[(&str, &str)]) -> Result<u64> {
        let mut url = self.endpoint(&format!("/rest/v1/{}", table))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            for (column, filter) in filters {
                query.append_pair(column, filter);
            }
        }

        let response = self
            .request(Method::HEAD, url)
            .await
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = ensure_success(&format!("count {}", table), response).await?;

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AdminError::remote(
                    format!("count {}", table),
                    Some(response.status().as_u16()),
                    "missing Content-Range header",
                )
            })?;

        parse_content_range(content_range).ok_or_else(|| {
            AdminError::remote(
                format!("count {}", table),
                None,
                format!("unexpected Content-Range: {}", content_range),
            )
        })
    }

    async fn last_sync(&self) -> Result<Option<LastSync>> {
        let mut url = self.endpoint("/rest/v1/sync_logs")?;
        url.query_pairs_mut()
            .append_pair("select", "sync_timestamp,status")
            .append_pair("order", "sync_timestamp.desc")
            .append_pair("limit", "1");

        let response = self.request(Method::GET, url).await.send().await?;
        let response = ensure_success("load sync_logs", response).await?;
        let rows: Vec<LastSync> = response.json().await?;
        Ok(rows.into_iter().next())
    }
}

/// 解析 `0-24/3573` 或 `*/0` 形式的總筆數
pub fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

/// 從錯誤回應中取出對使用者有意義的訊息
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

async fn ensure_success(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    tracing::debug!("{} returned {}: {}", operation, status, body);
    Err(AdminError::remote(operation, Some(status.as_u16()), message))
}

#[async_trait]
impl AuthGateway for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;

        let response = ensure_success("sign in", response)
            .await
            .map_err(|e| AdminError::AuthError {
                message: e.remote_message(),
            })?;

        let token: TokenResponse = response.json().await?;
        *self.access_token.write().await = Some(token.access_token);

        tracing::info!("🔐 Signed in as {}", token.user.email);
        Ok(token.user)
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(token) = self.access_token.write().await.take() else {
            return Ok(());
        };

        let url = self.endpoint("/auth/v1/logout")?;
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        ensure_success("sign out", response).await?;

        tracing::info!("🔓 Signed out");
        Ok(())
    }
}

#[async_trait]
impl EmployeeGateway for SupabaseClient {
    async fn upsert_employee(&self, record: &EmployeeRecord) -> Result<()> {
        self.rpc(IMPORT_EMPLOYEE_RPC, &ImportEmployeeParams::from(record))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BenefitsGateway for SupabaseClient {
    async fn recalculate_benefits(&self) -> Result<RecalculationResult> {
        let response = self
            .rpc(RECALCULATE_BENEFITS_RPC, &serde_json::json!({}))
            .await?;
        let body = response.text().await?;

        let value: serde_json::Value = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body)?
        };

        // 函式可能回傳單一物件，或只有一列的陣列
        let row = match &value {
            serde_json::Value::Array(rows) => rows.first().cloned().unwrap_or_default(),
            other => other.clone(),
        };
        let read = |key: &str| row.get(key).and_then(|v| v.as_u64()).unwrap_or(0);

        Ok(RecalculationResult {
            employees_processed: read("empleados_procesados"),
            benefits_created: read("beneficios_creados"),
        })
    }
}

#[async_trait]
impl StatsGateway for SupabaseClient {
    async fn load_stats(&self) -> Result<DashboardStats> {
        let total_employees = self.count("employees", &[("activo", "eq.true")]).await?;
        let total_deliveries = self.count("benefit_deliveries", &[]).await?;
        let total_powers = self.count("poder_simple", &[]).await?;

        let last_sync = match self.last_sync().await {
            Ok(last) => last,
            Err(e) => {
                tracing::warn!("⚠️ Could not read last sync: {}", e);
                None
            }
        };

        Ok(DashboardStats {
            total_employees,
            total_deliveries,
            total_powers,
            last_sync,
        })
    }
}

#[async_trait]
impl SyncLogGateway for SupabaseClient {
    async fn append_sync_log(&self, entry: &SyncLogEntry) -> Result<()> {
        let url = self.endpoint("/rest/v1/sync_logs")?;
        let response = self
            .request(Method::POST, url)
            .await
            .header("Prefer", "return=minimal")
            .json(entry)
            .send()
            .await?;
        ensure_success("append sync_logs", response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-24/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"code":"23505","message":"duplicate key value"}"#).as_deref(),
            Some("duplicate key value")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_import_params_use_rpc_argument_names() {
        let record = EmployeeRecord {
            identifier: "12345678".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            role: Some("Contadora".to_string()),
            contract_type: "indefinido".to_string(),
            start_date: None,
        };

        let json = serde_json::to_value(ImportEmployeeParams::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "p_cedula": "12345678",
                "p_nombre": "Ana",
                "p_apellido": "Pérez",
                "p_cargo": "Contadora",
                "p_tipo_contrato": "indefinido",
                "p_fecha_ingreso": null
            })
        );
    }
}
