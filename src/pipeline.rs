use chrono::{DateTime, Utc};
use pdf_tables_to_csv::{
    BatchFile, COMBINED_CSV_NAME, ExtractOptions, extract_batch_zip, extract_combined_from_bytes,
    extract_llp_batch_zip, extract_llp_from_bytes, extract_tables_from_bytes, llp_csv_string,
    table_csv_string,
};

use crate::error::ApiError;
use crate::models::{LlpRecordDto, LlpResponse, TableDto, TablesResponse, warning_dtos};

pub const TABLES_ZIP_PREFIX: &str = "pdf_tables";
pub const LLP_ZIP_PREFIX: &str = "llp_extracted";

/// File name for the register CSV of a single document.
pub const LLP_CSV_NAME: &str = "llp_records.csv";

pub fn timestamped_zip_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

pub fn tables_preview(
    pdf_bytes: &[u8],
    options: &ExtractOptions,
) -> Result<TablesResponse, ApiError> {
    let extraction = extract_tables_from_bytes(pdf_bytes, options)?;

    worker::console_log!(
        "table extraction completed: tables={}, warnings={}",
        extraction.tables.len(),
        extraction.warnings.len()
    );

    Ok(TablesResponse {
        table_count: extraction.tables.len(),
        tables: extraction.tables.iter().map(TableDto::from).collect(),
        warnings: warning_dtos(&extraction.warnings),
    })
}

/// Renders one detected table as CSV. `table_number` is the 1-based
/// document-wide table index; it defaults to the first table.
pub fn table_csv_download(
    pdf_bytes: &[u8],
    options: &ExtractOptions,
    table_number: Option<usize>,
) -> Result<(String, String), ApiError> {
    let extraction = extract_tables_from_bytes(pdf_bytes, options)?;
    let number = table_number.unwrap_or(1);
    let placed = extraction
        .tables
        .iter()
        .find(|table| table.index == number)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "table {number} not found; the document has {} tables",
                extraction.tables.len()
            ))
        })?;

    let csv = table_csv_string(&placed.table, options.delimiter)?;
    Ok((placed.csv_file_name(), csv))
}

pub fn combined_csv_download(
    pdf_bytes: &[u8],
    options: &ExtractOptions,
) -> Result<(String, String), ApiError> {
    let extraction = extract_combined_from_bytes(pdf_bytes, options)?;

    worker::console_log!(
        "combined extraction completed: rows={}, tables={}",
        extraction.table.rows.len(),
        extraction.table_count
    );

    let csv = table_csv_string(&extraction.table, options.delimiter)?;
    Ok((COMBINED_CSV_NAME.to_string(), csv))
}

pub fn batch_zip_download(
    files: &[BatchFile],
    options: &ExtractOptions,
) -> Result<(String, Vec<u8>), ApiError> {
    let output = extract_batch_zip(files, options)?;

    worker::console_log!(
        "batch extraction completed: files={}, warnings={}",
        output.files.len(),
        output.warnings.len()
    );

    Ok((timestamped_zip_name(TABLES_ZIP_PREFIX, Utc::now()), output.zip))
}

pub fn llp_preview(pdf_bytes: &[u8], options: &ExtractOptions) -> Result<LlpResponse, ApiError> {
    let extraction = extract_llp_from_bytes(pdf_bytes, options)?;

    worker::console_log!(
        "register extraction completed: records={}, warnings={}",
        extraction.records.len(),
        extraction.warnings.len()
    );

    Ok(LlpResponse {
        record_count: extraction.records.len(),
        records: extraction.records.iter().map(LlpRecordDto::from).collect(),
        warnings: warning_dtos(&extraction.warnings),
    })
}

pub fn llp_csv_download(
    pdf_bytes: &[u8],
    options: &ExtractOptions,
) -> Result<(String, String), ApiError> {
    let extraction = extract_llp_from_bytes(pdf_bytes, options)?;
    let csv = llp_csv_string(&extraction.records, options.delimiter)?;
    Ok((LLP_CSV_NAME.to_string(), csv))
}

pub fn llp_zip_download(
    files: &[BatchFile],
    options: &ExtractOptions,
) -> Result<(String, Vec<u8>), ApiError> {
    let output = extract_llp_batch_zip(files, options)?;

    worker::console_log!(
        "register batch completed: files={}, warnings={}",
        output.files.len(),
        output.warnings.len()
    );

    Ok((timestamped_zip_name(LLP_ZIP_PREFIX, Utc::now()), output.zip))
}
