#![allow(dead_code)]

use std::{future::Future, num::NonZeroU32, sync::Arc};

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use axum_task_user_service::{
    config::{Config, Services},
    route::create_router,
    AppState,
};

pub fn test_config(services: Services) -> Config {
    Config {
        services,
        password_hash_iterations: NonZeroU32::new(16).unwrap(),
        ..Config::default()
    }
}

pub fn app_from(config: &Config) -> Router {
    create_router(Arc::new(AppState::new(config)), config)
}

pub fn app_with(services: Services) -> Router {
    app_from(&test_config(services))
}

pub fn app() -> Router {
    app_with(Services::All)
}

/// Sends a request with a raw body and returns the status plus the decoded
/// JSON body (`Value::Null` when the body is empty).
pub fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: &str,
) -> impl Future<Output = (StatusCode, Value)> + Send {
    // Clone before awaiting: axum 0.6's `Router` is not `Sync`, so holding a
    // `&Router` across an await would make the future non-`Send`.
    let app = app.clone();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    async move {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> impl Future<Output = (StatusCode, Value)> + Send {
    let body = body.map(|value| value.to_string()).unwrap_or_default();
    send_raw(app, method, uri, &body)
}
