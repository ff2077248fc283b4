use pdf_tables_to_csv::{ExtractWarning, ExtractWarningCode, LlpRecord, PageTable};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_BATCH_FILES: usize = 24;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarningDto {
    pub code: String,
    pub message: String,
    pub page: Option<u32>,
    pub table: Option<usize>,
    pub file: Option<String>,
}

impl From<&ExtractWarning> for WarningDto {
    fn from(warning: &ExtractWarning) -> Self {
        Self {
            code: warning_code(warning.code).to_string(),
            message: warning.message.clone(),
            page: warning.page,
            table: warning.table,
            file: warning.file.clone(),
        }
    }
}

fn warning_code(code: ExtractWarningCode) -> &'static str {
    match code {
        ExtractWarningCode::NoTablesDetected => "no_tables_detected",
        ExtractWarningCode::NoRecordsMatched => "no_records_matched",
        ExtractWarningCode::RepeatedHeaderMismatch => "repeated_header_mismatch",
        ExtractWarningCode::RowsTruncated => "rows_truncated",
        ExtractWarningCode::MasterWidthMismatch => "master_width_mismatch",
    }
}

pub fn warning_dtos(warnings: &[ExtractWarning]) -> Vec<WarningDto> {
    warnings.iter().map(WarningDto::from).collect()
}

/// One detected table, rows included. Previews stay small because tables in
/// practice are page-sized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableDto {
    pub page: u32,
    pub index: usize,
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub row_count: usize,
}

impl From<&PageTable> for TableDto {
    fn from(placed: &PageTable) -> Self {
        Self {
            page: placed.page,
            index: placed.index,
            file_name: placed.csv_file_name(),
            columns: placed.table.columns.clone(),
            rows: placed.table.rows.clone(),
            row_count: placed.table.rows.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TablesResponse {
    pub table_count: usize,
    pub tables: Vec<TableDto>,
    pub warnings: Vec<WarningDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LlpRecordDto {
    pub no: u32,
    pub uen: String,
    pub name: String,
}

impl From<&LlpRecord> for LlpRecordDto {
    fn from(record: &LlpRecord) -> Self {
        Self {
            no: record.no,
            uen: record.uen.clone(),
            name: record.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LlpResponse {
    pub record_count: usize,
    pub records: Vec<LlpRecordDto>,
    pub warnings: Vec<WarningDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceIndexResponse {
    pub service: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
