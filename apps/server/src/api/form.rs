//! Request parameter extraction shared by the search and contact handlers

use crate::{Error, Result};
use axum::{
    extract::Request,
    http::{header, Method},
};

/// Collect `(key, value)` pairs from the query string and, for POST, a
/// form-urlencoded body, preserving request order.
pub async fn extract_items(request: Request, body_limit: usize) -> Result<Vec<(String, String)>> {
    let method = request.method().clone();
    let raw_query = request.uri().query().map(str::to_string);
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body_bytes = axum::body::to_bytes(request.into_body(), body_limit)
        .await
        .map_err(|e| Error::Validation(format!("Failed to read request body: {}", e)))?;

    parse_items(&method, raw_query.as_deref(), &content_type, &body_bytes)
}

pub fn parse_items(
    method: &Method,
    raw_query: Option<&str>,
    content_type: &str,
    body_bytes: &[u8],
) -> Result<Vec<(String, String)>> {
    let mut items = Vec::new();

    if let Some(q) = raw_query {
        items.extend(parse_form_urlencoded(q));
    }

    if method == Method::POST && !body_bytes.is_empty() {
        if content_type.contains("application/x-www-form-urlencoded") {
            let body_str = std::str::from_utf8(body_bytes)
                .map_err(|_| Error::Validation("Invalid UTF-8 in request body".to_string()))?;
            items.extend(parse_form_urlencoded(body_str));
        } else if !content_type.is_empty() {
            return Err(Error::UnsupportedMediaType(format!(
                "POST requires Content-Type: application/x-www-form-urlencoded, got: {}",
                content_type
            )));
        }
    }

    Ok(items)
}

/// Last value wins, matching how the form fields are read.
pub fn last_value<'a>(items: &'a [(String, String)], key: &str) -> Option<&'a str> {
    items
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_form_urlencoded(s: &str) -> impl Iterator<Item = (String, String)> + '_ {
    // '+' decodes to a space.
    url::form_urlencoded::parse(s.as_bytes()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_then_body_in_order() {
        let items = parse_items(
            &Method::POST,
            Some("type=music-search&title=blue+moon"),
            "application/x-www-form-urlencoded; charset=UTF-8",
            b"composer=Rodgers&title=Blue%20Room",
        )
        .unwrap();

        assert_eq!(
            items,
            vec![
                ("type".to_string(), "music-search".to_string()),
                ("title".to_string(), "blue moon".to_string()),
                ("composer".to_string(), "Rodgers".to_string()),
                ("title".to_string(), "Blue Room".to_string()),
            ]
        );
        assert_eq!(last_value(&items, "title"), Some("Blue Room"));
    }

    #[test]
    fn json_body_is_unsupported() {
        let err = parse_items(&Method::POST, None, "application/json", b"{}").unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(_)));
    }

    #[test]
    fn get_ignores_body() {
        let items = parse_items(&Method::GET, Some("type=indexed-books"), "", b"junk").unwrap();
        assert_eq!(items.len(), 1);
    }
}
