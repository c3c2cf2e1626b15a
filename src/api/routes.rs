use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::service::KeywordService;

use super::handlers::{
    analyze, clear_all_data, clear_cache, clear_history, export, export_history, get_ai_keywords,
    get_current, get_quota, get_suggestions, get_trends, health_check, list_favorites,
    list_history, list_providers, replenish_quota, reset_data, select_provider, set_current,
    toggle_favorite, AppState,
};

pub fn create_api_router(service: Arc<KeywordService>) -> Router {
    let state = Arc::new(AppState { service });

    let api_routes = Router::new()
        .route("/analyze", post(analyze))
        .route("/trends", get(get_trends))
        .route("/suggestions", get(get_suggestions))
        .route("/ai-keywords", get(get_ai_keywords))
        .route("/current", get(get_current))
        .route("/current", put(set_current))
        .route("/history", get(list_history))
        .route("/history", delete(clear_history))
        .route("/history/export", get(export_history))
        .route("/favorites", get(list_favorites))
        .route("/favorites/toggle", post(toggle_favorite))
        .route("/export", get(export))
        .route("/quota", get(get_quota))
        .route("/quota/replenish", post(replenish_quota))
        .route("/providers", get(list_providers))
        .route("/providers/selected", put(select_provider))
        .route("/cache", delete(clear_cache))
        .route("/reset", post(reset_data))
        .route("/data", delete(clear_all_data))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
