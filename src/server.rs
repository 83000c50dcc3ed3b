//! HTTP entry points for the three functions / 三个函数的 HTTP 入口
//!
//! Bodies keep the plain result strings callers already parse; the status code
//! carries the error kind.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::config::FunctionConfig;
use crate::handlers::{
    parse_bucket_name, GetHandler, GetObjectInfo, HandlerError, ListHandler, ObjectInfo, PutHandler,
};
use crate::storage::{ErrorKind, StorageClientFactory};

/// Shared state: one instance of each handler / 共享状态：每种处理器一个实例
#[derive(Clone)]
pub struct AppState {
    pub get: Arc<GetHandler>,
    pub list: Arc<ListHandler>,
    pub put: Arc<PutHandler>,
}

impl AppState {
    /// Initialize all handlers from the same configuration / 用同一配置初始化全部处理器
    pub fn new(config: &FunctionConfig, factory: &dyn StorageClientFactory) -> Self {
        Self {
            get: Arc::new(GetHandler::new(config, factory)),
            list: Arc::new(ListHandler::new(config, factory)),
            put: Arc::new(PutHandler::new(config, factory)),
        }
    }
}

/// HTTP status for an error kind / 错误类别对应的 HTTP 状态码
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Uninitialized => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Auth => StatusCode::UNAUTHORIZED,
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Transient => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Decode | ErrorKind::Service => StatusCode::BAD_GATEWAY,
    }
}

fn status_of<T>(result: &Result<T, HandlerError>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e.kind()),
    }
}

pub async fn get_object(State(state): State<AppState>, Json(input): Json<GetObjectInfo>) -> Response {
    let result = state.get.handle(&input).await;
    (status_of(&result), GetHandler::render(&result)).into_response()
}

pub async fn list_objects(State(state): State<AppState>, body: String) -> Response {
    let bucket_name = parse_bucket_name(&body);
    let result = state.list.handle(&bucket_name).await;
    let status = status_of(&result);
    (status, Json(result.unwrap_or_default())).into_response()
}

pub async fn put_object(State(state): State<AppState>, Json(input): Json<ObjectInfo>) -> Response {
    let result = state.put.handle(&input).await;
    (status_of(&result), PutHandler::render(&result)).into_response()
}

pub async fn health(State(state): State<AppState>) -> Response {
    let handlers = serde_json::json!({
        "get": state.get.context().is_ready(),
        "list": state.list.context().is_ready(),
        "put": state.put.context().is_ready(),
    });
    let all_ready = handlers
        .as_object()
        .map(|m| m.values().all(|v| v.as_bool().unwrap_or(false)))
        .unwrap_or(false);

    let status = if all_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = serde_json::json!({
        "status": if all_ready { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "handlers": handlers,
    });
    (status, Json(body)).into_response()
}

/// Build the router / 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get", post(get_object))
        .route("/list", post(list_objects))
        .route("/put", post(put_object))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
