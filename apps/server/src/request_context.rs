//! Per-request context injected by the request-id middleware.

use axum::http::Extensions;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Request id from the extensions, or `"-"` outside the middleware stack.
    pub fn request_id(extensions: &Extensions) -> String {
        extensions
            .get::<RequestContext>()
            .map(|ctx| ctx.request_id.clone())
            .unwrap_or_else(|| "-".to_string())
    }
}
