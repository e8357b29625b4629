use crate::domain::model::ImportSummary;
use crate::utils::error::Result;
use std::path::Path;

/// 將匯入失敗的記錄寫成 CSV，欄位沿用匯入檔的表頭名稱
pub fn write_failure_report<P: AsRef<Path>>(summary: &ImportSummary, path: P) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["CEDULA", "NOMBRE", "APELLIDO", "ERROR"])?;
    for failure in &summary.failures {
        writer.write_record([
            failure.identifier.as_str(),
            failure.first_name.as_str(),
            failure.last_name.as_str(),
            failure.reason.as_str(),
        ])?;
    }
    writer.flush()?;

    tracing::info!(
        "📝 Wrote {} failed records to {}",
        summary.failures.len(),
        path.display()
    );
    Ok(summary.failures.len())
}
