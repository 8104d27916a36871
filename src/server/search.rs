//! GET /search

use super::AppState;
use crate::lyrics::{self, SearchError, SearchRequest, SearchResult};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

const REQUIRED_PARAMS: &[&str] = &["q {str}"];
const OPTIONAL_PARAMS: &[&str] = &[
    "trLang {str, ISO 639-1 code}",
    "providers {list[str]}",
    "synced {bool}",
    "enhanced {bool}",
];

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: u16,
    #[serde(flatten)]
    pub result: SearchResult,
}

/// Raw query pairs; `providers` may repeat, so a plain struct won't do.
pub async fn search_lyrics(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>, ApiError> {
    let req = parse_request(&params)?;
    let result = lyrics::search(&*state.backend, &req).await?;
    Ok(Json(SearchResponse {
        status: StatusCode::OK.as_u16(),
        result,
    }))
}

/// Build a validated request from query pairs.
pub fn parse_request(params: &[(String, String)]) -> Result<SearchRequest, SearchError> {
    let get = |name: &str| {
        params
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    let query = get("q").unwrap_or_default();
    let translation = get("trLang").map(str::to_string);
    let synced = get("synced").map(|v| parse_bool("synced", v)).transpose()?;
    let enhanced = get("enhanced").map(|v| parse_bool("enhanced", v)).transpose()?;

    let providers = params
        .iter()
        .filter(|(k, _)| k == "providers")
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty());

    Ok(SearchRequest::new(query)?
        .with_translation(translation)
        .with_providers(providers)?
        .with_synced(synced.unwrap_or(true))
        .with_enhanced(enhanced.unwrap_or(false)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, SearchError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(SearchError::validation(format!(
            "Invalid boolean for '{name}': '{value}'"
        ))),
    }
}

/// HTTP rendering of [`SearchError`]
#[derive(Debug)]
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            SearchError::Validation { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": message,
                    "required_params": REQUIRED_PARAMS,
                    "optional_params": OPTIONAL_PARAMS,
                }),
            ),
            SearchError::NotFound { .. } => (StatusCode::NOT_FOUND, json!(self.0.to_string())),
            SearchError::Backend(e) => {
                tracing::error!("lyrics backend failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!(e.to_string()))
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
