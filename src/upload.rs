use pdf_tables_to_csv::BatchFile;
use worker::{FormData, FormEntry, Request};

use crate::error::ApiError;

pub const SINGLE_FILE_FIELD: &str = "file";
pub const BATCH_FILE_FIELD: &str = "files";

const FALLBACK_FILE_NAME: &str = "document.pdf";

/// Reads the `file` part of a multipart upload and returns its raw bytes.
pub async fn read_single_upload(req: &mut Request) -> Result<Vec<u8>, ApiError> {
    let form = read_form(req).await?;
    let Some(entry) = form.get(SINGLE_FILE_FIELD) else {
        return Err(ApiError::BadRequest(format!(
            "missing multipart field \"{SINGLE_FILE_FIELD}\""
        )));
    };

    let (_, bytes) = read_file_entry(entry, SINGLE_FILE_FIELD).await?;
    Ok(bytes)
}

/// Reads every `files` part of a multipart upload. Uploads above
/// `max_files` are rejected before any file content is read.
pub async fn read_batch_upload(
    req: &mut Request,
    max_files: usize,
) -> Result<Vec<BatchFile>, ApiError> {
    let form = read_form(req).await?;
    let Some(entries) = form.get_all(BATCH_FILE_FIELD) else {
        return Err(ApiError::BadRequest(format!(
            "missing multipart field \"{BATCH_FILE_FIELD}\""
        )));
    };

    if entries.len() > max_files {
        return Err(ApiError::PayloadTooLarge(format!(
            "batch holds {} files but at most {max_files} are accepted",
            entries.len()
        )));
    }

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let (file_name, bytes) = read_file_entry(entry, BATCH_FILE_FIELD).await?;
        files.push(BatchFile { file_name, bytes });
    }
    Ok(files)
}

async fn read_form(req: &mut Request) -> Result<FormData, ApiError> {
    req.form_data()
        .await
        .map_err(|error| ApiError::BadRequest(format!("invalid multipart body: {error}")))
}

async fn read_file_entry(entry: FormEntry, field: &str) -> Result<(String, Vec<u8>), ApiError> {
    let FormEntry::File(file) = entry else {
        return Err(ApiError::BadRequest(format!(
            "multipart field \"{field}\" must contain file parts"
        )));
    };

    let file_name = if file.name().is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        file.name()
    };

    let bytes = file.bytes().await?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "uploaded file \"{file_name}\" is empty"
        )));
    }

    Ok((file_name, bytes))
}
