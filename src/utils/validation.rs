use crate::utils::error::{AdminError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 範本設定檔中的佔位值，代表尚未設定
pub const PLACEHOLDER_VALUES: &[&str] = &[
    "YOUR_SUPABASE_URL_HERE",
    "YOUR_SUPABASE_ANON_KEY_HERE",
    "YOUR_APPS_SCRIPT_DEPLOYMENT_URL_HERE",
];

pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    PLACEHOLDER_VALUES.contains(&trimmed) || (trimmed.starts_with("${") && trimmed.ends_with('}'))
}

pub fn validate_not_placeholder(field_name: &str, value: &str) -> Result<()> {
    if is_placeholder(value) {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value is still a placeholder; set the real credential".to_string(),
        });
    }
    Ok(())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AdminError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let extension = std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("supabase.url", "https://abc.supabase.co").is_ok());
        assert!(validate_url("supabase.url", "http://localhost:54321").is_ok());
        assert!(validate_url("supabase.url", "").is_err());
        assert!(validate_url("supabase.url", "invalid-url").is_err());
        assert!(validate_url("supabase.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_placeholders_are_rejected() {
        assert!(validate_not_placeholder("supabase.url", "YOUR_SUPABASE_URL_HERE").is_err());
        assert!(validate_not_placeholder("supabase.anon_key", "${SUPABASE_ANON_KEY}").is_err());
        assert!(validate_not_placeholder("supabase.anon_key", "eyJhbGciOi").is_ok());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("file", "nomina.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("file", "NOMINA.CSV", &["csv"]).is_ok());
        assert!(validate_file_extension("file", "nomina.xlsx", &["csv"]).is_err());
        assert!(validate_file_extension("file", "nomina", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("import.delay_ms", 50u64, 0, 60_000).is_ok());
        assert!(validate_range("import.delay_ms", 90_000u64, 0, 60_000).is_err());
        assert!(validate_positive_number("activity.capacity", 0, 1).is_err());
    }
}
