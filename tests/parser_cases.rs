use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;

use pdf_table_worker::error::ApiError;
use pdf_table_worker::models::{LlpRecordDto, TableDto, WarningDto};
use pdf_table_worker::pipeline::{
    LLP_ZIP_PREFIX, TABLES_ZIP_PREFIX, timestamped_zip_name,
};
use pdf_table_worker::routes::{
    content_disposition, parse_extract_options, parse_table_query, service_index,
};
use pdf_tables_to_csv::{
    ExtractError, ExtractWarning, ExtractWarningCode, LlpRecord, PageTable, ResultTable,
};

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn extract_options_default_to_comma_and_all_pages() {
    let options = parse_extract_options(&query(&[])).expect("default options");

    assert_eq!(options.delimiter, b',');
    assert!(options.pages.is_none());
}

#[test]
fn extract_options_parse_pages_and_delimiter() {
    let options =
        parse_extract_options(&query(&[("pages", "1-2,5"), ("delimiter", ";")])).expect("options");

    let pages = options.pages.expect("page selection");
    assert!(pages.contains(1));
    assert!(pages.contains(2));
    assert!(!pages.contains(3));
    assert!(pages.contains(5));
    assert_eq!(options.delimiter, b';');
}

#[test]
fn invalid_pages_and_delimiter_are_validation_errors() {
    let bad_pages = parse_extract_options(&query(&[("pages", "abc")])).expect_err("bad pages");
    assert_eq!(bad_pages.code(), "validation_error");
    assert_eq!(bad_pages.status_code(), 422);

    let two_chars = parse_extract_options(&query(&[("delimiter", "ab")])).expect_err("two chars");
    assert_eq!(two_chars.code(), "validation_error");

    let non_ascii = parse_extract_options(&query(&[("delimiter", "€")])).expect_err("non ascii");
    assert_eq!(non_ascii.code(), "validation_error");
}

#[test]
fn table_query_is_one_based_and_optional() {
    assert_eq!(parse_table_query(&query(&[])).expect("absent"), None);
    assert_eq!(
        parse_table_query(&query(&[("table", "3")])).expect("third"),
        Some(3)
    );

    let zero = parse_table_query(&query(&[("table", "0")])).expect_err("zero");
    assert_eq!(zero.code(), "bad_request");

    let word = parse_table_query(&query(&[("table", "first")])).expect_err("word");
    assert_eq!(word.code(), "bad_request");
}

#[test]
fn zip_names_carry_a_second_resolution_timestamp() {
    let now: DateTime<Utc> = "2026-08-22T10:30:05Z".parse().expect("valid datetime");

    assert_eq!(
        timestamped_zip_name(TABLES_ZIP_PREFIX, now),
        "pdf_tables_20260822_103005.zip"
    );
    assert_eq!(
        timestamped_zip_name(LLP_ZIP_PREFIX, now),
        "llp_extracted_20260822_103005.zip"
    );
}

#[test]
fn content_disposition_quotes_the_file_name() {
    assert_eq!(
        content_disposition("attachment", "pdf_tables_20260822_103005.zip"),
        "attachment; filename=\"pdf_tables_20260822_103005.zip\""
    );
    assert_eq!(
        content_disposition("inline", "pdf_combined_table.csv"),
        "inline; filename=\"pdf_combined_table.csv\""
    );
}

#[test]
fn empty_batch_maps_to_bad_request() {
    let error = ApiError::from(ExtractError::EmptyBatch);

    assert_eq!(error.code(), "bad_request");
    assert_eq!(error.status_code(), 400);
}

#[test]
fn oversized_batch_maps_to_payload_too_large() {
    let error = ApiError::PayloadTooLarge("batch holds 30 files".to_string());

    assert_eq!(error.code(), "payload_too_large");
    assert_eq!(error.status_code(), 413);
}

#[test]
fn warning_dto_preserves_location_fields() {
    let warning = ExtractWarning::new(ExtractWarningCode::NoTablesDetected, "no tables detected")
        .with_page(4)
        .with_file("scan.pdf");

    let dto = WarningDto::from(&warning);

    assert_eq!(dto.code, "no_tables_detected");
    assert_eq!(dto.message, "no tables detected");
    assert_eq!(dto.page, Some(4));
    assert_eq!(dto.table, None);
    assert_eq!(dto.file.as_deref(), Some("scan.pdf"));
}

#[test]
fn table_dto_carries_the_per_table_csv_name() {
    let placed = PageTable {
        page: 2,
        index: 3,
        table: ResultTable {
            columns: vec!["Name".to_string(), "Age".to_string()],
            rows: vec![vec![Some("Alice".to_string()), Some("30".to_string())]],
        },
    };

    let dto = TableDto::from(&placed);

    assert_eq!(dto.file_name, "pdf_table_2_3.csv");
    assert_eq!(dto.page, 2);
    assert_eq!(dto.index, 3);
    assert_eq!(dto.row_count, 1);
    assert_eq!(dto.columns, vec!["Name".to_string(), "Age".to_string()]);
}

#[test]
fn register_record_serializes_with_lowercase_keys() {
    let record = LlpRecord {
        no: 1,
        uen: "T05LL0746J".to_string(),
        name: "CHRIS & VIC LLP".to_string(),
    };

    let value = serde_json::to_value(LlpRecordDto::from(&record)).expect("serialize record");

    assert_eq!(value["no"], 1);
    assert_eq!(value["uen"], "T05LL0746J");
    assert_eq!(value["name"], "CHRIS & VIC LLP");
}

#[test]
fn service_index_lists_every_post_endpoint() {
    let index = service_index();

    assert_eq!(index.service, "pdf-table-worker");
    assert!(index.endpoints.iter().any(|e| e == "POST /api/v1/tables"));
    assert!(index.endpoints.iter().any(|e| e == "POST /api/v1/batch/zip"));
    assert!(index.endpoints.iter().any(|e| e == "POST /api/v1/llp/zip"));
}
