//! Error types for the search server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use birdland_query::{Binding, RequestError, Statement};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which statement of a request failed at the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Rows,
    Count,
    Books,
}

impl QueryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStage::Rows => "rows",
            QueryStage::Count => "count",
            QueryStage::Books => "books",
        }
    }
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStage::Rows | QueryStage::Books => f.write_str("SELECT"),
            QueryStage::Count => f.write_str("SELECT COUNT(*)"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("ERROR 1: {0}")]
    StoreConnection(String),

    #[error("ERROR: {stage} failed, {message}")]
    QueryExecution {
        stage: QueryStage,
        message: String,
        statement: Statement,
    },

    #[error("Send message failed. Error: {0}")]
    Mail(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure shape returned to search clients: `{error, query, binding}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEnvelope {
    pub error: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<Binding>,
}

impl Error {
    /// Query text and bindings are included only when `expose_diagnostics` is set.
    pub fn to_envelope(&self, expose_diagnostics: bool) -> FailureEnvelope {
        let (query, binding) = match self {
            Error::QueryExecution {
                stage, statement, ..
            } if expose_diagnostics => {
                let binding = match stage {
                    QueryStage::Books => None,
                    QueryStage::Rows | QueryStage::Count => Some(statement.binding.clone()),
                };
                (statement.sql.clone(), binding)
            }
            _ => (String::new(), None),
        };

        FailureEnvelope {
            error: self.to_string(),
            query,
            binding,
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Request(_) => "request",
            Error::StoreConnection(_) => "store_connection",
            Error::QueryExecution { .. } => "query_execution",
            Error::Mail(_) => "mail",
            Error::Validation(_) => "validation",
            Error::UnsupportedMediaType(_) => "unsupported_media_type",
            Error::Internal(_) | Error::Other(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            // The search envelope is the client contract, so these stay 200.
            Error::Request(_) | Error::StoreConnection(_) | Error::QueryExecution { .. } => {
                (StatusCode::OK, Json(self.to_envelope(false))).into_response()
            }
            Error::Mail(_) => (
                StatusCode::OK,
                Json(json!({ "text": "", "error": self.to_string() })),
            )
                .into_response(),
            Error::Validation(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Error::UnsupportedMediaType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Error::Internal(_) | Error::Other(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
