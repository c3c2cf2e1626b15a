use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analysis::MAX_KEYWORD_IDEAS;
use crate::error::KeywordError;
use crate::export::ExportFormat;
use crate::models::{KeywordAnalysis, SearchHistoryEntry, TrendPoint};
use crate::provider::{ProviderInfo, ProviderKind};
use crate::service::KeywordService;

pub struct AppState {
    pub service: Arc<KeywordService>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: KeywordError) -> ApiError {
    let status = match &e {
        KeywordError::Validation(_) => StatusCode::BAD_REQUEST,
        KeywordError::State(_) => StatusCode::CONFLICT,
        KeywordError::QuotaExhausted => StatusCode::TOO_MANY_REQUESTS,
        KeywordError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        KeywordError::ProviderUnavailable(_) | KeywordError::GovernorClosed => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        KeywordError::Provider(_) => StatusCode::BAD_GATEWAY,
        KeywordError::Storage(_) | KeywordError::TaskAborted => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct KeywordQuery {
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct IdeasQuery {
    pub keyword: String,
    #[serde(default = "default_idea_count")]
    pub count: usize,
}

fn default_idea_count() -> usize {
    MAX_KEYWORD_IDEAS
}

#[derive(Deserialize)]
pub struct ExportQuery {
    #[serde(default = "default_format")]
    pub format: ExportFormat,
}

fn default_format() -> ExportFormat {
    ExportFormat::Json
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaResponse {
    pub searches_remaining: u32,
}

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub selected: ProviderKind,
    pub providers: Vec<ProviderInfo>,
}

#[derive(Deserialize)]
pub struct SelectProviderRequest {
    pub provider: ProviderKind,
}

#[derive(Serialize)]
pub struct ClearCacheResponse {
    pub removed: usize,
}

pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}

/// Analyze a seed keyword
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<KeywordAnalysis>, ApiError> {
    state
        .service
        .search_keyword(&payload.keyword)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeywordQuery>,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    state
        .service
        .trends(&query.keyword)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeywordQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    state
        .service
        .suggestions(&query.keyword)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Generated keyword ideas for a seed
pub async fn get_ai_keywords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdeasQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    state
        .service
        .ai_keywords(&query.keyword, query.count)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Get the analysis currently selected for export
pub async fn get_current(
    State(state): State<Arc<AppState>>,
) -> Result<Json<KeywordAnalysis>, ApiError> {
    match state.service.current().await {
        Some(analysis) => Ok(Json(analysis)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No keyword analysis selected".to_string(),
            }),
        )),
    }
}

/// Select a stored analysis as the current result
pub async fn set_current(
    State(state): State<Arc<AppState>>,
    Json(analysis): Json<KeywordAnalysis>,
) -> Json<KeywordAnalysis> {
    state.service.select_result(analysis.clone()).await;
    Json(analysis)
}

pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<Vec<SearchHistoryEntry>> {
    Json(state.service.history().await)
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .service
        .clear_history()
        .await
        .map_err(error_response)?;

    Ok(Json(SuccessResponse {
        message: "History cleared".to_string(),
    }))
}

/// Export every past search as CSV
pub async fn export_history(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state
        .service
        .export_history()
        .await
        .map_err(error_response)?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}

pub async fn list_favorites(State(state): State<Arc<AppState>>) -> Json<Vec<KeywordAnalysis>> {
    Json(state.service.favorites().await)
}

/// Add the analysis to favorites, or remove it if already saved
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Json(analysis): Json<KeywordAnalysis>,
) -> Result<Json<Vec<KeywordAnalysis>>, ApiError> {
    state
        .service
        .toggle_favorite(analysis)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Export the current analysis as JSON or CSV text
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let body = state
        .service
        .export(query.format)
        .await
        .map_err(error_response)?;

    let content_type = match query.format {
        ExportFormat::Json => "application/json",
        ExportFormat::Csv => "text/csv; charset=utf-8",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

pub async fn get_quota(State(state): State<Arc<AppState>>) -> Json<QuotaResponse> {
    Json(QuotaResponse {
        searches_remaining: state.service.quota().await,
    })
}

pub async fn replenish_quota(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuotaResponse>, ApiError> {
    let searches_remaining = state
        .service
        .replenish_quota()
        .await
        .map_err(error_response)?;

    Ok(Json(QuotaResponse { searches_remaining }))
}

pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        selected: state.service.selected_provider().await,
        providers: state.service.providers(),
    })
}

pub async fn select_provider(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectProviderRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .service
        .select_provider(payload.provider)
        .await
        .map_err(error_response)?;

    Ok(Json(SuccessResponse {
        message: format!("Provider set to {}", payload.provider),
    }))
}

pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearCacheResponse>, ApiError> {
    let removed = state.service.clear_cache().await.map_err(error_response)?;
    Ok(Json(ClearCacheResponse { removed }))
}

/// Forget history, favorites, and the current result
pub async fn reset_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.service.reset_data().await.map_err(error_response)?;

    Ok(Json(SuccessResponse {
        message: "All data reset".to_string(),
    }))
}

/// Wipe every stored key, including caches and preferences
pub async fn clear_all_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.service.clear_all().await.map_err(error_response)?;

    Ok(Json(SuccessResponse {
        message: "All stored data cleared".to_string(),
    }))
}
