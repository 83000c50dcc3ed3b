use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::FunctionConfig;

pub mod error;
pub mod memory;

pub use error::{kind_for_status, ErrorKind, InitError, StorageError};
pub use memory::InMemoryStorage;

/// Address of a single object / 单个对象的地址
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocator {
    pub namespace: String,
    pub bucket_name: String,
    pub object_name: String,
}

impl ObjectLocator {
    pub fn new(
        namespace: impl Into<String>,
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
        }
    }

    pub fn bucket(&self) -> BucketLocator {
        BucketLocator::new(self.namespace.clone(), self.bucket_name.clone())
    }
}

impl fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.bucket_name, self.object_name)
    }
}

/// Address of a bucket / 存储桶地址
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketLocator {
    pub namespace: String,
    pub bucket_name: String,
}

impl BucketLocator {
    pub fn new(namespace: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            bucket_name: bucket_name.into(),
        }
    }
}

impl fmt::Display for BucketLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.bucket_name)
    }
}

/// Object summary as returned by ListObjects / 列举结果中的对象摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<String>,
}

/// One page of ListObjects / ListObjects 的单页结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjects {
    #[serde(default)]
    pub objects: Vec<ObjectSummary>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Set when the service truncated the listing / 列举被截断时返回
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_start_with: Option<String>,
}

/// Result of PutObject / PutObject 结果
#[derive(Debug, Clone, PartialEq)]
pub struct PutObjectResponse {
    /// Opaque id assigned by the service / 服务端分配的请求 ID
    pub opc_request_id: String,
    pub etag: Option<String>,
}

/// Object storage backend / 对象存储后端
///
/// One call per operation, no retries. Implementations must be cheap to share
/// behind an `Arc` across invocations.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Backend name for logs / 后端名称
    fn name(&self) -> &str;

    /// Fetch the full object body / 获取对象内容
    async fn get_object(&self, locator: &ObjectLocator) -> Result<Bytes, StorageError>;

    /// List the first page of objects in a bucket / 列举存储桶中的对象（单页）
    async fn list_objects(&self, bucket: &BucketLocator) -> Result<ListObjects, StorageError>;

    /// Upload an object body / 上传对象
    async fn put_object(
        &self,
        locator: &ObjectLocator,
        body: Bytes,
    ) -> Result<PutObjectResponse, StorageError>;
}

/// Builds the client a handler uses for its lifetime / 构建处理器整个生命周期使用的客户端
pub trait StorageClientFactory: Send + Sync {
    /// Factory name for logs / 工厂名称
    fn factory_type(&self) -> &'static str;

    fn create_client(&self, config: &FunctionConfig) -> Result<Arc<dyn ObjectStorage>, InitError>;
}
