//! Storage error types / 存储错误类型

use std::path::PathBuf;
use thiserror::Error;

/// Failure category exposed to callers / 对调用方暴露的错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Handler has no usable client / 处理器没有可用客户端
    Uninitialized,
    /// Request was rejected as unauthenticated / 认证失败
    Auth,
    PermissionDenied,
    NotFound,
    Conflict,
    /// Network error, throttling or 5xx / 网络错误、限流或服务端错误
    Transient,
    InvalidInput,
    /// Response could not be understood / 响应无法解析
    Decode,
    /// Any other service error / 其他服务端错误
    Service,
}

/// Errors raised while building a storage client / 构建存储客户端时的错误
#[derive(Debug, Error)]
pub enum InitError {
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),

    #[error("problem accessing OCI private key at {}: {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors raised by a storage call / 存储调用错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error response returned by the service / 服务端返回的错误响应
    #[error("{code} (status {status}): {message}{}", request_id_suffix(.request_id))]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to sign request: {0}")]
    Signing(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (opc-request-id {})", id),
        None => String::new(),
    }
}

impl StorageError {
    /// Build a service error / 构建服务端错误
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Service {
            status,
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::Service { status, .. } => kind_for_status(*status),
            StorageError::Transport(e) => {
                if e.is_decode() {
                    ErrorKind::Decode
                } else {
                    ErrorKind::Transient
                }
            }
            StorageError::Signing(_) => ErrorKind::Auth,
            StorageError::Decode(_) => ErrorKind::Decode,
            StorageError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Map an HTTP status from the service to an error kind / HTTP 状态码映射为错误类别
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 | 411 | 413 | 416 => ErrorKind::InvalidInput,
        401 => ErrorKind::Auth,
        403 => ErrorKind::PermissionDenied,
        404 => ErrorKind::NotFound,
        409 | 412 => ErrorKind::Conflict,
        408 | 429 | 500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Service,
    }
}
