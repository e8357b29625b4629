use crate::core::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::core::throttle::DEFAULT_IMPORT_DELAY;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub supabase: SupabaseConfig,
    pub apps_script: Option<AppsScriptConfig>,
    pub import: Option<ImportConfig>,
    pub activity: Option<ActivityConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout_seconds: Option<u64>,
}

impl SupabaseConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppsScriptConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    pub delay_ms: Option<u64>,
    pub error_report_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

/// 配置實際來源，於日誌初始化後才記錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Environment => write!(f, "environment variables"),
        }
    }
}

impl AdminConfig {
    /// 設定檔存在時讀取檔案，否則改讀環境變數
    pub fn load<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::from_file(path)?, ConfigSource::File(path.to_path_buf())))
        } else {
            Ok((Self::from_env()?, ConfigSource::Environment))
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdminError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})；未設定的變數保留原樣，交由驗證階段拒絕
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| AdminError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 沒有設定檔時，直接從環境變數建立
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| AdminError::MissingConfigError {
                field: name.to_string(),
            })
        };

        let delay_ms = match std::env::var("IMPORT_DELAY_MS") {
            Ok(value) => Some(value.parse::<u64>().map_err(|e| {
                AdminError::InvalidConfigValueError {
                    field: "IMPORT_DELAY_MS".to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?),
            Err(_) => None,
        };

        Ok(Self {
            supabase: SupabaseConfig {
                url: required("SUPABASE_URL")?,
                anon_key: required("SUPABASE_ANON_KEY")?,
                timeout_seconds: None,
            },
            apps_script: Some(AppsScriptConfig {
                url: std::env::var("APPS_SCRIPT_URL").ok(),
            }),
            import: Some(ImportConfig {
                delay_ms,
                error_report_path: None,
            }),
            activity: None,
            monitoring: None,
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_not_placeholder("supabase.url", &self.supabase.url)?;
        validation::validate_url("supabase.url", &self.supabase.url)?;
        validation::validate_not_placeholder("supabase.anon_key", &self.supabase.anon_key)?;
        validation::validate_non_empty_string("supabase.anon_key", &self.supabase.anon_key)?;
        validation::validate_range("supabase.timeout_seconds", self.supabase.timeout_seconds(), 1, 600)?;

        if let Some(url) = self.apps_script_url() {
            validation::validate_url("apps_script.url", url)?;
        }

        if let Some(delay) = self.import.as_ref().and_then(|i| i.delay_ms) {
            validation::validate_range("import.delay_ms", delay, 0, 60_000)?;
        }

        if let Some(path) = self.error_report_path() {
            validation::validate_path("import.error_report_path", path)?;
        }

        if let Some(capacity) = self.activity.as_ref().and_then(|a| a.capacity) {
            validation::validate_positive_number("activity.capacity", capacity, 1)?;
        }

        Ok(())
    }

    /// Apps Script URL；空字串或範本佔位值視為未設定
    pub fn apps_script_url(&self) -> Option<&str> {
        self.apps_script
            .as_ref()
            .and_then(|a| a.url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty() && !validation::is_placeholder(url))
    }

    pub fn import_delay(&self) -> Duration {
        self.import
            .as_ref()
            .and_then(|i| i.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_IMPORT_DELAY)
    }

    pub fn error_report_path(&self) -> Option<&str> {
        self.import.as_ref().and_then(|i| i.error_report_path.as_deref())
    }

    pub fn activity_capacity(&self) -> usize {
        self.activity
            .as_ref()
            .and_then(|a| a.capacity)
            .unwrap_or(DEFAULT_ACTIVITY_CAPACITY)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.supabase.timeout_seconds())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl Validate for AdminConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
