use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::models::{Code, CodeList, CodeLists, Codes, Edition, Editions};

use super::{AppState, errors::ApiError, pagination::PaginationParams};

/// Graph health document; 503 unless the last ping succeeded
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.health.check().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "service": env!("CARGO_PKG_NAME"),
            "status": report.status,
            "version": env!("CARGO_PKG_VERSION"),
            "message": report.message
        })),
    )
}

pub async fn get_code_lists(
    State(state): State<Arc<AppState>>,
    params: PaginationParams,
) -> Result<Json<CodeLists>, ApiError> {
    let window = params.window(&state.config)?;
    let code_lists = state.store.get_code_lists().await?;
    Ok(Json(window.apply(code_lists)))
}

pub async fn get_code_list(
    State(state): State<Arc<AppState>>,
    Path(code_list_id): Path<String>,
) -> Result<Json<CodeList>, ApiError> {
    let code_list = state.store.get_code_list(&code_list_id).await?;
    Ok(Json(code_list))
}

pub async fn get_editions(
    State(state): State<Arc<AppState>>,
    Path(code_list_id): Path<String>,
    params: PaginationParams,
) -> Result<Json<Editions>, ApiError> {
    let window = params.window(&state.config)?;
    let editions = state.store.get_editions(&code_list_id).await?;
    Ok(Json(window.apply(editions)))
}

pub async fn get_edition(
    State(state): State<Arc<AppState>>,
    Path((code_list_id, edition_id)): Path<(String, String)>,
) -> Result<Json<Edition>, ApiError> {
    let edition = state.store.get_edition(&code_list_id, &edition_id).await?;
    Ok(Json(edition))
}

pub async fn get_codes(
    State(state): State<Arc<AppState>>,
    Path((code_list_id, edition_id)): Path<(String, String)>,
    params: PaginationParams,
) -> Result<Json<Codes>, ApiError> {
    let window = params.window(&state.config)?;
    let codes = state.store.get_codes(&code_list_id, &edition_id).await?;
    Ok(Json(window.apply(codes)))
}

pub async fn get_code(
    State(state): State<Arc<AppState>>,
    Path((code_list_id, edition_id, code)): Path<(String, String, String)>,
) -> Result<Json<Code>, ApiError> {
    let code = state
        .store
        .get_code(&code_list_id, &edition_id, &code)
        .await?;
    Ok(Json(code))
}
