// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! REST facade for the lifecycle service.
//!
//! Every response uses the envelope `{success, message, data}`. Status code
//! mapping: validation and invalid transitions → 400, unknown id → 404,
//! registry invariant violations → 500.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::application::{AppLifecycleService, CreateAppRequest, LifecycleError};
use crate::domain::app::AppId;

pub struct AppState {
    pub lifecycle: Arc<AppLifecycleService>,
    pub service_name: String,
}

/// Uniform JSON response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

type ApiResponse = (StatusCode, Json<Envelope>);

pub fn app(lifecycle: Arc<AppLifecycleService>, service_name: impl Into<String>) -> Router {
    let state = Arc::new(AppState {
        lifecycle,
        service_name: service_name.into(),
    });

    Router::new()
        .route("/api/v1/apps", post(create_app).get(list_apps))
        .route("/api/v1/apps/{id}", get(get_app).delete(delete_app))
        .route("/api/v1/apps/{id}/start", post(start_app))
        .route("/api/v1/apps/{id}/stop", post(stop_app))
        .route("/api/v1/apps/{id}/error", post(mark_app_error))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn success(status: StatusCode, message: impl Into<String>, data: serde_json::Value) -> ApiResponse {
    (
        status,
        Json(Envelope {
            success: true,
            message: message.into(),
            data: Some(data),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> ApiResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(Envelope {
            success: false,
            message: message.into(),
            data: None,
        }),
    )
}

fn failure(err: LifecycleError) -> ApiResponse {
    let status = match &err {
        LifecycleError::Validation(_) | LifecycleError::Transition(_) => StatusCode::BAD_REQUEST,
        LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
        LifecycleError::DuplicateId(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "lifecycle invariant violation");
    }
    (
        status,
        Json(Envelope {
            success: false,
            message: err.to_string(),
            data: None,
        }),
    )
}

fn record_json(record: &crate::domain::app::AppRecord) -> serde_json::Value {
    serde_json::to_value(record).unwrap_or(serde_json::Value::Null)
}

#[derive(Debug, Deserialize)]
struct CreateAppBody {
    name: String,
    host: String,
    port: u16,
    #[serde(default)]
    config: HashMap<String, serde_json::Value>,
}

async fn create_app(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAppBody>, JsonRejection>,
) -> ApiResponse {
    // Missing/empty/malformed bodies are a 400 in the envelope, not the
    // default extractor rejection.
    let Json(body) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let request = CreateAppRequest {
        name: body.name,
        host: body.host,
        port: body.port,
        config: body.config,
    };

    match state.lifecycle.create(request).await {
        Ok(record) => success(
            StatusCode::CREATED,
            "application created",
            record_json(&record),
        ),
        Err(err) => failure(err),
    }
}

async fn list_apps(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.lifecycle.list().await {
        Ok(records) => {
            let apps: Vec<_> = records.iter().map(record_json).collect();
            success(StatusCode::OK, "applications listed", json!({ "apps": apps }))
        }
        Err(err) => failure(err),
    }
}

async fn get_app(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResponse {
    let id = AppId::from(id);
    match state.lifecycle.get(&id).await {
        Ok(record) => success(StatusCode::OK, "application found", record_json(&record)),
        Err(err) => failure(err),
    }
}

async fn start_app(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResponse {
    let id = AppId::from(id);
    match state.lifecycle.start(&id).await {
        Ok(record) => success(StatusCode::OK, "application started", record_json(&record)),
        Err(err) => failure(err),
    }
}

async fn stop_app(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResponse {
    let id = AppId::from(id);
    match state.lifecycle.stop(&id).await {
        Ok(record) => success(StatusCode::OK, "application stopped", record_json(&record)),
        Err(err) => failure(err),
    }
}

async fn mark_app_error(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResponse {
    let id = AppId::from(id);
    match state.lifecycle.mark_error(&id).await {
        Ok(record) => success(
            StatusCode::OK,
            "application marked as errored",
            record_json(&record),
        ),
        Err(err) => failure(err),
    }
}

async fn delete_app(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResponse {
    let id = AppId::from(id);
    match state.lifecycle.remove(&id).await {
        Ok(()) => success(StatusCode::OK, "application removed", json!({ "id": id })),
        Err(err) => failure(err),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.lifecycle.list().await {
        Ok(records) => success(
            StatusCode::OK,
            "healthy",
            json!({
                "service": state.service_name,
                "applications": records.len(),
            }),
        ),
        Err(err) => failure(err),
    }
}
