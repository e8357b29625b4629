use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// `RUST_LOG` 優先；否則只放行本 crate 的指定等級
fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("payroll_admin={}", level)))
}

/// 日誌一律寫到 stderr，stdout 留給指令結果
pub fn init_logger(format: LogFormat, level: &str) {
    let filter = crate_filter(level);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, if verbose { "debug" } else { "info" });
}

/// JSON 格式輸出，供排程或容器環境收集日誌
pub fn init_json_logger(level: Option<&str>) {
    init_logger(LogFormat::Json, level.unwrap_or("info"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_filter_targets_this_crate() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(crate_filter("debug").to_string(), "payroll_admin=debug");
    }
}
