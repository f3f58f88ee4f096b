#![allow(dead_code)]

pub mod fakes;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use birdland_search::{api::create_router, AppState, Config};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt as _;

pub use fakes::{FakeCatalogStore, RecordingMailer, StoreScript};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: FakeCatalogStore,
    pub mailer: RecordingMailer,
}

impl TestApp {
    pub fn new(script: StoreScript) -> Self {
        Self::new_with_config(script, |_| {})
    }

    pub fn new_with_config(script: StoreScript, configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        configure(&mut config);

        let store = FakeCatalogStore::new(script);
        let mailer = RecordingMailer::default();
        let state = AppState::from_parts(config, Arc::new(store.clone()), Arc::new(mailer.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
            mailer,
        }
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request(Method::GET, path_and_query, None, None).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form: &str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request(
            Method::POST,
            path,
            Some("application/x-www-form-urlencoded"),
            Some(Bytes::copy_from_slice(form.as_bytes())),
        )
        .await
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        content_type: Option<&str>,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// GET a search and decode the JSON envelope, asserting HTTP 200.
    pub async fn search(&self, query: &str) -> anyhow::Result<Value> {
        let (status, _, body) = self.get(&format!("/api/search?{query}")).await?;
        assert_eq!(status, StatusCode::OK, "body: {}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).context("decode search envelope")
    }
}

pub fn json_body(body: &Bytes) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("decode JSON body")
}
