use std::collections::HashMap;

use pdf_tables_to_csv::{ExtractOptions, PageSelection};
use serde::Serialize;
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::error::ApiError;
use crate::models::{DEFAULT_MAX_BATCH_FILES, LlpResponse, ServiceIndexResponse, TablesResponse};
use crate::pipeline;
use crate::upload;

#[derive(Debug, Clone)]
pub struct AppState {
    pub max_batch_files: usize,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let max_batch_files = env
        .var("MAX_BATCH_FILES")
        .ok()
        .and_then(|value| value.to_string().parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_BATCH_FILES);

    let state = AppState { max_batch_files };

    Router::with_data(state)
        .get_async("/", index_route)
        .post_async("/api/v1/tables", tables_route)
        .post_async("/api/v1/tables/csv", tables_csv_route)
        .post_async("/api/v1/combined/csv", combined_csv_route)
        .post_async("/api/v1/batch/zip", batch_zip_route)
        .post_async("/api/v1/llp", llp_route)
        .post_async("/api/v1/llp/csv", llp_csv_route)
        .post_async("/api/v1/llp/zip", llp_zip_route)
        .run(req, env)
        .await
}

async fn index_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    json_response(&service_index())
}

async fn tables_route(mut req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    match tables_response(&mut req).await {
        Ok(payload) => json_response(&payload),
        Err(error) => error_response("table extraction failed", error),
    }
}

async fn tables_csv_route(mut req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    match tables_csv_response(&mut req).await {
        Ok(response) => Ok(response),
        Err(error) => error_response("table csv download failed", error),
    }
}

async fn combined_csv_route(mut req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    match combined_csv_response(&mut req).await {
        Ok(response) => Ok(response),
        Err(error) => error_response("combined csv download failed", error),
    }
}

async fn batch_zip_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match batch_zip_response(&mut req, ctx.data.max_batch_files).await {
        Ok(response) => Ok(response),
        Err(error) => error_response("batch extraction failed", error),
    }
}

async fn llp_route(mut req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    match llp_response(&mut req).await {
        Ok(payload) => json_response(&payload),
        Err(error) => error_response("register extraction failed", error),
    }
}

async fn llp_csv_route(mut req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    match llp_csv_response(&mut req).await {
        Ok(response) => Ok(response),
        Err(error) => error_response("register csv download failed", error),
    }
}

async fn llp_zip_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match llp_zip_response(&mut req, ctx.data.max_batch_files).await {
        Ok(response) => Ok(response),
        Err(error) => error_response("register batch failed", error),
    }
}

async fn tables_response(req: &mut Request) -> Result<TablesResponse, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let pdf_bytes = upload::read_single_upload(req).await?;
    pipeline::tables_preview(&pdf_bytes, &options)
}

async fn tables_csv_response(req: &mut Request) -> Result<Response, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let table_number = parse_table_query(&query)?;
    let pdf_bytes = upload::read_single_upload(req).await?;

    let (file_name, csv) = pipeline::table_csv_download(&pdf_bytes, &options, table_number)?;
    csv_response(csv, &file_name)
}

async fn combined_csv_response(req: &mut Request) -> Result<Response, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let pdf_bytes = upload::read_single_upload(req).await?;

    let (file_name, csv) = pipeline::combined_csv_download(&pdf_bytes, &options)?;
    csv_response(csv, &file_name)
}

async fn batch_zip_response(req: &mut Request, max_batch_files: usize) -> Result<Response, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let files = upload::read_batch_upload(req, max_batch_files).await?;

    let (file_name, zip) = pipeline::batch_zip_download(&files, &options)?;
    zip_response(zip, &file_name)
}

async fn llp_response(req: &mut Request) -> Result<LlpResponse, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let pdf_bytes = upload::read_single_upload(req).await?;
    pipeline::llp_preview(&pdf_bytes, &options)
}

async fn llp_csv_response(req: &mut Request) -> Result<Response, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let pdf_bytes = upload::read_single_upload(req).await?;

    let (file_name, csv) = pipeline::llp_csv_download(&pdf_bytes, &options)?;
    csv_response(csv, &file_name)
}

async fn llp_zip_response(req: &mut Request, max_batch_files: usize) -> Result<Response, ApiError> {
    let query = parse_query(req)?;
    let options = parse_extract_options(&query)?;
    let files = upload::read_batch_upload(req, max_batch_files).await?;

    let (file_name, zip) = pipeline::llp_zip_download(&files, &options)?;
    zip_response(zip, &file_name)
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn error_response(context: &str, error: ApiError) -> Result<Response> {
    worker::console_error!("{context}: {error}");
    error.into_response()
}

fn csv_response(csv: String, file_name: &str) -> Result<Response, ApiError> {
    let mut response = Response::ok(csv)?;
    response
        .headers_mut()
        .set("Content-Type", "text/csv; charset=utf-8")?;
    response
        .headers_mut()
        .set("Content-Disposition", &content_disposition("inline", file_name))?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn zip_response(zip: Vec<u8>, file_name: &str) -> Result<Response, ApiError> {
    let mut response = Response::from_bytes(zip)?;
    response
        .headers_mut()
        .set("Content-Type", "application/zip")?;
    response.headers_mut().set(
        "Content-Disposition",
        &content_disposition("attachment", file_name),
    )?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn parse_query(req: &Request) -> Result<HashMap<String, String>, ApiError> {
    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    Ok(query)
}

pub fn parse_extract_options(query: &HashMap<String, String>) -> Result<ExtractOptions, ApiError> {
    let mut options = ExtractOptions::default();

    if let Some(raw) = query.get("pages") {
        let selection = raw.parse::<PageSelection>().map_err(ApiError::Validation)?;
        options.pages = Some(selection);
    }

    if let Some(raw) = query.get("delimiter") {
        options.delimiter = parse_delimiter(raw)?;
    }

    Ok(options)
}

fn parse_delimiter(raw: &str) -> Result<u8, ApiError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() => Ok(ch as u8),
        _ => Err(ApiError::Validation(
            "delimiter must be a single ASCII character".to_string(),
        )),
    }
}

pub fn parse_table_query(query: &HashMap<String, String>) -> Result<Option<usize>, ApiError> {
    let Some(raw) = query.get("table") else {
        return Ok(None);
    };

    let parsed = raw.parse::<usize>()?;
    if parsed == 0 {
        return Err(ApiError::BadRequest(
            "table numbering starts at 1".to_string(),
        ));
    }

    Ok(Some(parsed))
}

pub fn service_index() -> ServiceIndexResponse {
    ServiceIndexResponse {
        service: "pdf-table-worker".to_string(),
        endpoints: vec![
            "POST /api/v1/tables".to_string(),
            "POST /api/v1/tables/csv".to_string(),
            "POST /api/v1/combined/csv".to_string(),
            "POST /api/v1/batch/zip".to_string(),
            "POST /api/v1/llp".to_string(),
            "POST /api/v1/llp/csv".to_string(),
            "POST /api/v1/llp/zip".to_string(),
        ],
    }
}

pub fn content_disposition(disposition: &str, file_name: &str) -> String {
    format!("{disposition}; filename=\"{file_name}\"")
}
