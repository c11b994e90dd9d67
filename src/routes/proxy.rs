use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use super::AppState;
use crate::error::AppError;
use crate::proxy::ResultEnvelope;

/// Query parameters as ordered pairs, so a repeated `url` resolves to its
/// last occurrence instead of failing to deserialize.
type QueryPairs = Vec<(String, String)>;

pub async fn proxy_request(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<ResultEnvelope>, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::InvalidQuery(e.body_text()))?;

    let url = match last_param(pairs, "url") {
        Some(url) if !url.is_empty() => url,
        _ => return Err(AppError::MissingParameter("url")),
    };

    forward(&state, &url).await
}

fn last_param(pairs: QueryPairs, name: &str) -> Option<String> {
    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Forwards the fixed self-test URL.
pub async fn self_test(State(state): State<AppState>) -> Result<Json<ResultEnvelope>, AppError> {
    let url = state.self_test_url.clone();
    forward(&state, &url).await
}

async fn forward(state: &AppState, url: &str) -> Result<Json<ResultEnvelope>, AppError> {
    match state.forwarder.forward(url).await {
        Ok(envelope) => {
            tracing::debug!(status_code = envelope.status_code, "Request succeeded");
            Ok(Json(envelope))
        }
        Err(e) => {
            tracing::warn!(status = %e.status_code(), message = %e, "Request failed");
            Err(e.into())
        }
    }
}
