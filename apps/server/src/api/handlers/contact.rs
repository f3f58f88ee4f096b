//! Contact form handler (`POST /api/contact`, `/contact.php`)

use crate::{
    api::form,
    services::{contact::ContactForm, ContactService},
    state::AppState,
    Error,
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub async fn contact_handler(State(state): State<AppState>, request: Request) -> Response {
    let body_limit = state.config.server.max_request_body_size;
    let items = match form::extract_items(request, body_limit).await {
        Ok(items) => items,
        Err(e) => return e.into_response(),
    };

    let field = |key: &str| form::last_value(&items, key).unwrap_or("").trim().to_string();
    let contact = ContactForm {
        name: field("name"),
        email: field("email"),
        comments: field("comments"),
    };

    submit(&state.contact_service, &contact).await
}

async fn submit(service: &ContactService, contact: &ContactForm) -> Response {
    match service.submit(contact).await {
        Ok(text) => reply(text, ""),
        // A rejected field is a form outcome, not a transport failure.
        Err(e @ (Error::Validation(_) | Error::Mail(_))) => reply("", &e.to_string()),
        Err(e) => e.into_response(),
    }
}

fn reply(text: &str, error: &str) -> Response {
    (StatusCode::OK, Json(json!({ "text": text, "error": error }))).into_response()
}
