use crate::utils::error::ParseError;

/// Excel 的「CSV UTF-8」匯出會在檔首加上 BOM
const UTF8_BOM: char = '\u{FEFF}';

/// 一行 CSV 切分後的欄位（已去除空白）
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv {
    /// 表頭欄位，已轉為大寫供別名比對
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// 解析 CSV 文字。
///
/// 僅以逗號切分，不支援引號包住的欄位：欄位內含逗號會導致欄位錯位。
pub fn parse(text: &str) -> Result<ParsedCsv, ParseError> {
    let lines: Vec<&str> = text
        .strip_prefix(UTF8_BOM)
        .unwrap_or(text)
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(ParseError::EmptyFile);
    }

    let header = split_line(lines[0])
        .into_iter()
        .map(|cell| cell.to_uppercase())
        .collect();

    let rows = lines[1..].iter().map(|line| split_line(line)).collect();

    Ok(ParsedCsv { header, rows })
}

fn split_line(line: &str) -> RawRow {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}
