//! Search handler
//!
//! `GET|POST /api/search` (and `/search.php`). Every search outcome is a 200
//! with the JSON envelope; only transport failures use 4xx.

use crate::{api::form, request_context::RequestContext, state::AppState, Error};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

pub async fn search_handler(State(state): State<AppState>, request: Request) -> Response {
    let request_id = RequestContext::request_id(request.extensions());
    let body_limit = state.config.server.max_request_body_size;
    let items = match form::extract_items(request, body_limit).await {
        Ok(items) => items,
        Err(e) => return e.into_response(),
    };

    let response = match state.search_service.search(&items).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => search_failure(e, &request_id, state.config.search.expose_diagnostics),
    };
    no_cache(response)
}

fn search_failure(err: Error, request_id: &str, expose_diagnostics: bool) -> Response {
    match err {
        Error::Request(_) | Error::StoreConnection(_) | Error::QueryExecution { .. } => {
            tracing::info!(request_id, kind = err.kind(), error = %err, "Search failed");
            (StatusCode::OK, Json(err.to_envelope(expose_diagnostics))).into_response()
        }
        other => other.into_response(),
    }
}

fn no_cache(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}
