use thiserror::Error;

/// CSV 匯入的致命錯誤：整個檔案被拒絕，不會發出任何遠端呼叫
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("El archivo CSV está vacío o no tiene datos")]
    EmptyFile,

    #[error("El archivo CSV debe contener al menos las columnas: CEDULA, NOMBRE, APELLIDO")]
    MissingRequiredColumns,

    #[error("No se encontraron empleados válidos en el archivo CSV")]
    NoValidRecords,
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{operation} failed: {message}")]
    Remote {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Remote,
    Auth,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束碼；任何錯誤都不會回傳 0
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl AdminError {
    pub fn remote(operation: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AdminError::ApiError(_) => ErrorCategory::Network,
            AdminError::CsvError(_) | AdminError::Parse(_) => ErrorCategory::Input,
            AdminError::IoError(_) | AdminError::SerializationError(_) => ErrorCategory::System,
            AdminError::Remote { .. } => ErrorCategory::Remote,
            AdminError::AuthError { .. } | AdminError::AuthenticationRequired => {
                ErrorCategory::Auth
            }
            AdminError::UrlError(_)
            | AdminError::ConfigError { .. }
            | AdminError::MissingConfigError { .. }
            | AdminError::InvalidConfigValueError { .. }
            | AdminError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Auth => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 遠端回傳的原始訊息；其他錯誤則使用 Display
    pub fn remote_message(&self) -> String {
        match self {
            AdminError::Remote { message, .. } => message.clone(),
            AdminError::AuthError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdminError::ApiError(_) => "Check the network connection and the Supabase URL",
            AdminError::Parse(ParseError::EmptyFile) => {
                "Provide a CSV with a header line and at least one data row"
            }
            AdminError::Parse(ParseError::MissingRequiredColumns) => {
                "Add CEDULA (or RUT/CI), NOMBRE and APELLIDO columns to the header"
            }
            AdminError::Parse(ParseError::NoValidRecords) => {
                "Make sure every row has cedula, nombre and apellido filled in"
            }
            AdminError::CsvError(_) | AdminError::IoError(_) => {
                "Check that the file exists and is readable"
            }
            AdminError::SerializationError(_) => "The backend returned an unexpected payload",
            AdminError::Remote { .. } => "Inspect the backend logs; the operation can be retried",
            AdminError::AuthError { .. } => "Verify the administrator email and password",
            AdminError::AuthenticationRequired => {
                "Pass --email/--password or set ADMIN_EMAIL and ADMIN_PASSWORD"
            }
            AdminError::UrlError(_)
            | AdminError::ConfigError { .. }
            | AdminError::MissingConfigError { .. }
            | AdminError::InvalidConfigValueError { .. }
            | AdminError::ConfigValidationError { .. } => {
                "Update payroll-admin.toml or the SUPABASE_* environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AdminError::Parse(e) => e.to_string(),
            AdminError::Remote { message, .. } => message.clone(),
            AdminError::AuthError { message } => format!("No se pudo iniciar sesión: {}", message),
            AdminError::AuthenticationRequired => "Inicia sesión para continuar".to_string(),
            AdminError::ApiError(_) => "No se pudo conectar con el servidor".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
