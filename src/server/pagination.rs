use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::models::Page;

use super::errors::ApiError;

/// Raw `offset`/`limit` query parameters, validated by [`PaginationParams::window`]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

/// Malformed query strings (e.g. a repeated key) become JSON 400s
impl<S> FromRequestParts<S> for PaginationParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(params)
    }
}

/// Effective offset and limit for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

impl Window {
    pub fn apply<T>(self, page: Page<T>) -> Page<T> {
        page.paginate(self.offset, self.limit)
    }
}

fn parse_non_negative(name: &str, raw: &str) -> Result<usize, ApiError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ApiError::BadRequest(format!("invalid query parameter {}: {:?}", name, raw)))
}

impl PaginationParams {
    /// Resolves the window: absent values fall back to the configured
    /// defaults and `limit` is clamped to `max_limit`.
    pub fn window(&self, config: &ServerConfig) -> Result<Window, ApiError> {
        let offset = match self.offset.as_deref() {
            Some(raw) => parse_non_negative("offset", raw)?,
            None => config.default_offset,
        };
        let limit = match self.limit.as_deref() {
            Some(raw) => parse_non_negative("limit", raw)?,
            None => config.default_limit,
        };

        Ok(Window {
            offset,
            limit: limit.min(config.max_limit),
        })
    }
}
