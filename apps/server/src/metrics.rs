//! Prometheus metrics for the search server

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "birdland_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "birdland_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "birdland_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// HTTP response size in bytes
    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "birdland_http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "path", "status"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
    )
    .expect("Failed to register HTTP_RESPONSE_SIZE_BYTES");

    // Search Metrics

    /// Searches by mode and outcome (`ok` or an error kind)
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "birdland_search_total",
        "Total number of catalog searches",
        &["mode", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Rows returned per search
    pub static ref SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "birdland_search_results",
        "Number of rows returned by search",
        &["mode"],
        vec![0.0, 1.0, 10.0, 25.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]
    )
    .expect("Failed to register SEARCH_RESULTS");

    // Database Metrics

    /// Database query duration by statement stage
    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "birdland_db_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    )
    .expect("Failed to register DB_QUERY_DURATION_SECONDS");

    /// Database query errors by statement stage
    pub static ref DB_QUERY_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "birdland_db_query_errors_total",
        "Total number of database query errors",
        &["query_type"]
    )
    .expect("Failed to register DB_QUERY_ERRORS_TOTAL");

    // Contact Metrics

    pub static ref CONTACT_MESSAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "birdland_contact_messages_total",
        "Total number of contact form submissions",
        &["status"]
    )
    .expect("Failed to register CONTACT_MESSAGES_TOTAL");
}

/// Map a request path onto a fixed set of labels so probes for arbitrary
/// URLs cannot blow up label cardinality.
pub fn sanitize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let path = if trimmed.is_empty() { "/" } else { trimmed };

    match path {
        "/" | "/health" | "/metrics" | "/api/search" | "/api/contact" | "/search.php"
        | "/contact.php" => path.to_string(),
        _ => "/other".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/search"), "/api/search");
        assert_eq!(sanitize_path("/api/search/"), "/api/search");
        assert_eq!(sanitize_path("/search.php"), "/search.php");
        assert_eq!(sanitize_path("/health"), "/health");
        assert_eq!(sanitize_path("/"), "/");
        assert_eq!(sanitize_path(""), "/");
        assert_eq!(sanitize_path("/wp-admin/setup.php"), "/other");
    }
}
