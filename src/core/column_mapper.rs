use crate::core::csv_parser::{self, RawRow};
use crate::domain::model::{EmployeeRecord, DEFAULT_CONTRACT_TYPE};
use crate::utils::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Identifier,
    FirstName,
    LastName,
    Role,
    ContractType,
    StartDate,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Identifier,
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::Role,
        CanonicalField::ContractType,
        CanonicalField::StartDate,
    ];

    /// 可接受的表頭名稱，依優先順序
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Identifier => &["CEDULA", "RUT", "CI"],
            CanonicalField::FirstName => &["NOMBRE", "NOMBRES"],
            CanonicalField::LastName => &["APELLIDO", "APELLIDOS"],
            CanonicalField::Role => &["CARGO", "PUESTO", "POSICION"],
            CanonicalField::ContractType => &["TIPO_CONTRATO", "TIPOCONTRATO", "CONTRATO"],
            CanonicalField::StartDate => &["FECHA_INGRESO", "FECHAINGRESO", "INGRESO"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderIndex {
    pub identifier: Option<usize>,
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub role: Option<usize>,
    pub contract_type: Option<usize>,
    pub start_date: Option<usize>,
}

impl HeaderIndex {
    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        match field {
            CanonicalField::Identifier => self.identifier,
            CanonicalField::FirstName => self.first_name,
            CanonicalField::LastName => self.last_name,
            CanonicalField::Role => self.role,
            CanonicalField::ContractType => self.contract_type,
            CanonicalField::StartDate => self.start_date,
        }
    }
}

fn find_column(header: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| header.iter().position(|cell| cell == alias))
}

pub fn resolve(header: &[String]) -> Result<HeaderIndex, ParseError> {
    let index = HeaderIndex {
        identifier: find_column(header, CanonicalField::Identifier.aliases()),
        first_name: find_column(header, CanonicalField::FirstName.aliases()),
        last_name: find_column(header, CanonicalField::LastName.aliases()),
        role: find_column(header, CanonicalField::Role.aliases()),
        contract_type: find_column(header, CanonicalField::ContractType.aliases()),
        start_date: find_column(header, CanonicalField::StartDate.aliases()),
    };

    if index.identifier.is_none() || index.first_name.is_none() || index.last_name.is_none() {
        return Err(ParseError::MissingRequiredColumns);
    }

    tracing::debug!(
        "Resolved columns: {:?}",
        CanonicalField::ALL
            .iter()
            .map(|field| (*field, index.position(*field)))
            .collect::<Vec<_>>()
    );

    Ok(index)
}

fn cell(row: &RawRow, position: Option<usize>) -> Option<String> {
    position
        .and_then(|idx| row.get(idx))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// 將單行轉為員工記錄；欄位不足或必填欄位空白時回傳 None
pub fn map_row(row: &RawRow, index: &HeaderIndex) -> Option<EmployeeRecord> {
    if row.len() < 3 {
        return None;
    }

    let identifier = cell(row, index.identifier)?;
    let first_name = cell(row, index.first_name)?;
    let last_name = cell(row, index.last_name)?;

    Some(EmployeeRecord {
        identifier,
        first_name,
        last_name,
        role: cell(row, index.role),
        contract_type: cell(row, index.contract_type)
            .unwrap_or_else(|| DEFAULT_CONTRACT_TYPE.to_string()),
        start_date: cell(row, index.start_date),
    })
}

pub fn map_records(rows: &[RawRow], index: &HeaderIndex) -> Result<Vec<EmployeeRecord>, ParseError> {
    let records: Vec<EmployeeRecord> = rows.iter().filter_map(|row| map_row(row, index)).collect();

    if records.is_empty() {
        return Err(ParseError::NoValidRecords);
    }

    let skipped = rows.len() - records.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} rows without cedula/nombre/apellido", skipped);
    }

    Ok(records)
}

/// 解析 + 欄位對應 + 轉換，一次完成
pub fn build_records(text: &str) -> Result<Vec<EmployeeRecord>, ParseError> {
    let parsed = csv_parser::parse(text)?;
    let index = resolve(&parsed.header)?;
    let records = map_records(&parsed.rows, &index)?;

    tracing::info!("📋 Parsed {} employees from CSV", records.len());
    Ok(records)
}
