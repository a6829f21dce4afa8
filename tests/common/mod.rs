#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use car_api::auth::{generate_jwt, Claims};
use car_api::config::AppConfig;
use car_api::database::MemoryCarStore;
use car_api::{app, AppState};

pub const BOUNDARY: &str = "car-api-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
}

impl TestApp {
    /// Router over a fresh in-memory store with uploads in a private temp dir
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "test-secret".to_string();
        config.upload.dir = std::env::temp_dir()
            .join(format!("car-api-test-{}", Uuid::new_v4().simple()));

        let state = AppState::new(MemoryCarStore::new_shared(), config.clone());
        Self {
            router: app(state),
            config,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload.dir.clone()
    }

    pub fn token_for(&self, owner: Uuid) -> String {
        generate_jwt(&Claims::new(owner, 1), &self.config.security).expect("token")
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, bytes.to_vec())
    }

    /// Create a car through the API and return its JSON
    pub async fn create_car(&self, owner: Uuid, body: Value) -> Value {
        let (status, car) = self
            .send(json_request("POST", "/api/cars", Some(&self.token_for(owner)), Some(body)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", car);
        car
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.config.upload.dir);
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// A file part for [`multipart_request`]: (part name, file name, bytes)
pub type FilePart<'a> = (&'a str, &'a str, &'a [u8]);

pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

