//! Function handlers / 函数处理器
//!
//! Each handler builds its client once and keeps the outcome as its state:
//! `Ready` with a shared client, or `Uninitialized` with the reason. There is no
//! way back to `Uninitialized` once a client exists.

use std::sync::Arc;
use thiserror::Error;

use crate::config::FunctionConfig;
use crate::storage::{ErrorKind, InitError, ObjectStorage, StorageClientFactory, StorageError};

pub mod get;
pub mod list;
pub mod put;

pub use get::{GetHandler, GetObjectInfo};
pub use list::{parse_bucket_name, ListHandler};
pub use put::{ObjectInfo, PutAck, PutHandler};

/// Result string returned when the handler has no client / 处理器未初始化时返回
pub const FAILED: &str = "FAILED";

/// Handler lifecycle state / 处理器状态
pub enum HandlerState {
    Uninitialized(InitError),
    Ready(Arc<dyn ObjectStorage>),
}

/// Errors returned by a handler call / 处理器调用错误
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("storage client is not initialized: {0}")]
    Uninitialized(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HandlerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::Uninitialized(_) => ErrorKind::Uninitialized,
            HandlerError::InvalidInput(_) => ErrorKind::InvalidInput,
            HandlerError::Storage(e) => e.kind(),
        }
    }
}

/// State shared by the three handlers / 三个处理器共用的上下文
pub struct HandlerContext {
    name: &'static str,
    namespace: String,
    state: HandlerState,
}

impl HandlerContext {
    /// Build the client and record the outcome / 构建客户端并记录结果
    pub fn initialize(
        name: &'static str,
        config: &FunctionConfig,
        factory: &dyn StorageClientFactory,
    ) -> Self {
        let state = match factory.create_client(config) {
            Ok(client) => {
                tracing::info!(
                    "{} handler ready (factory={}, backend={}, namespace={})",
                    name,
                    factory.factory_type(),
                    client.name(),
                    config.namespace
                );
                HandlerState::Ready(client)
            }
            Err(e) => {
                tracing::error!("Error occurred creating storage client for {} handler - {}", name, e);
                HandlerState::Uninitialized(e)
            }
        };

        Self {
            name,
            namespace: config.namespace.clone(),
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn state(&self) -> &HandlerState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, HandlerState::Ready(_))
    }

    /// Reason the client could not be built / 初始化失败原因
    pub fn init_error(&self) -> Option<&InitError> {
        match &self.state {
            HandlerState::Uninitialized(e) => Some(e),
            HandlerState::Ready(_) => None,
        }
    }

    /// Client, or the uninitialized error / 获取客户端
    pub fn client(&self) -> Result<&Arc<dyn ObjectStorage>, HandlerError> {
        match &self.state {
            HandlerState::Ready(client) => Ok(client),
            HandlerState::Uninitialized(e) => {
                tracing::warn!(
                    "There was a problem creating the storage client for {} handler, check logs: {}",
                    self.name,
                    e
                );
                Err(HandlerError::Uninitialized(e.to_string()))
            }
        }
    }
}

/// Reject blank names before any remote call / 空名称直接拒绝
fn require_name(value: &str, field: &str) -> Result<(), HandlerError> {
    if value.trim().is_empty() {
        return Err(HandlerError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}
