use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    config::QueryLimits,
    error::PriceError,
    models::price::{ErrorResponse, PriceRecord, ResultFormat, ScanQuery},
    services::{
        csv::to_csv,
        pagination::cancellation,
        price_query::{lookup_postcode, scan_prefix},
    },
};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Handler for GET /postcode/{postcode}
/// Exact postcode lookup
pub async fn get_prices_by_postcode(
    State(state): State<AppState>,
    Path(postcode): Path<String>,
) -> Result<Response, ApiError> {
    tracing::info!("Price lookup for postcode {:?}", postcode);

    let (_cancel_handle, cancel) = cancellation();
    let records = lookup_postcode(state.table.as_ref(), &postcode, state.config.lookup, &cancel)
        .await
        .map_err(error_response)?;

    Ok(respond(&state, records, ResultFormat::Json, &postcode))
}

/// Handler for GET /postcode/scan/{prefix}?format=CSV
pub async fn get_prices_by_scan(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
    Query(query): Query<ScanQuery>,
) -> Result<Response, ApiError> {
    let format = ResultFormat::parse(query.format.as_deref());
    scan(&state, &prefix, format, state.config.scan).await
}

/// Handler for GET /postcode/{prefix}/{format}
/// `CSV` returns a file attachment; any other format returns JSON
pub async fn get_prices_formatted(
    State(state): State<AppState>,
    Path((prefix, format)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let format = ResultFormat::parse(Some(&format));
    scan(&state, &prefix, format, state.config.export).await
}

async fn scan(
    state: &AppState,
    prefix: &str,
    format: ResultFormat,
    limits: QueryLimits,
) -> Result<Response, ApiError> {
    tracing::info!("Price scan for prefix {:?} as {:?}", prefix, format);

    let (_cancel_handle, cancel) = cancellation();
    let records = scan_prefix(state.table.as_ref(), prefix, limits, &cancel)
        .await
        .map_err(error_response)?;

    Ok(respond(state, records, format, prefix))
}

fn respond(
    state: &AppState,
    records: Vec<PriceRecord>,
    format: ResultFormat,
    search: &str,
) -> Response {
    // No rows is not an error, but it is not a 200 either
    if records.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            format!("No records found in Outcode partition of {}.", state.table.name()),
        )
            .into_response();
    }

    match format {
        ResultFormat::Json => (StatusCode::OK, Json(records)).into_response(),
        ResultFormat::Csv => {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
            headers.insert(header::CONTENT_DISPOSITION, attachment(search));

            (StatusCode::OK, headers, to_csv(&records)).into_response()
        }
    }
}

/// `attachment; filename="LandregPrices.{search}.csv"`
fn attachment(search: &str) -> HeaderValue {
    // Header values must be visible ASCII; quotes would end the filename
    let name: String = search
        .chars()
        .map(|c| if (c.is_ascii_graphic() || c == ' ') && c != '"' { c } else { '_' })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"LandregPrices.{}.csv\"", name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"LandregPrices.csv\""))
}

fn error_response(err: PriceError) -> ApiError {
    let status = match &err {
        PriceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        PriceError::Format { .. } | PriceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PriceError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    };

    if status.is_server_error() {
        tracing::error!("Price query failed: {}", err);
    } else {
        tracing::warn!("Rejected price query: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
