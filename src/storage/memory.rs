//! In-memory object storage / 内存对象存储
//!
//! Mirrors the service's observable behaviour closely enough for handler tests:
//! lexicographic listing, 404 codes for missing buckets and objects, a fresh
//! request id per write.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    BucketLocator, InitError, ListObjects, ObjectLocator, ObjectStorage, ObjectSummary,
    PutObjectResponse, StorageClientFactory, StorageError,
};
use crate::config::FunctionConfig;

type Bucket = BTreeMap<String, Bytes>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    buckets: Arc<RwLock<BTreeMap<BucketLocator, Bucket>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket, returns false if it already existed / 创建空存储桶
    pub async fn create_bucket(&self, namespace: &str, bucket_name: &str) -> bool {
        let mut buckets = self.buckets.write().await;
        let key = BucketLocator::new(namespace, bucket_name);
        if buckets.contains_key(&key) {
            return false;
        }
        buckets.insert(key, Bucket::new());
        true
    }

    pub async fn object_count(&self, bucket: &BucketLocator) -> usize {
        self.buckets
            .read()
            .await
            .get(bucket)
            .map(|b| b.len())
            .unwrap_or(0)
    }
}

fn bucket_not_found(bucket: &BucketLocator) -> StorageError {
    StorageError::service(
        404,
        "BucketNotFound",
        format!(
            "Either the bucket named '{}' does not exist in the namespace '{}' or you are not authorized to access it",
            bucket.bucket_name, bucket.namespace
        ),
    )
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_object(&self, locator: &ObjectLocator) -> Result<Bytes, StorageError> {
        let bucket = locator.bucket();
        let buckets = self.buckets.read().await;
        let objects = buckets.get(&bucket).ok_or_else(|| bucket_not_found(&bucket))?;
        objects.get(&locator.object_name).cloned().ok_or_else(|| {
            StorageError::service(
                404,
                "ObjectNotFound",
                format!(
                    "The object '{}' was not found in the bucket '{}'",
                    locator.object_name, locator.bucket_name
                ),
            )
        })
    }

    async fn list_objects(&self, bucket: &BucketLocator) -> Result<ListObjects, StorageError> {
        let buckets = self.buckets.read().await;
        let objects = buckets.get(bucket).ok_or_else(|| bucket_not_found(bucket))?;
        Ok(ListObjects {
            objects: objects
                .iter()
                .map(|(name, data)| ObjectSummary {
                    name: name.clone(),
                    size: Some(data.len() as u64),
                    time_created: None,
                })
                .collect(),
            prefixes: Vec::new(),
            next_start_with: None,
        })
    }

    async fn put_object(
        &self,
        locator: &ObjectLocator,
        body: Bytes,
    ) -> Result<PutObjectResponse, StorageError> {
        let bucket = locator.bucket();
        let mut buckets = self.buckets.write().await;
        let objects = buckets
            .get_mut(&bucket)
            .ok_or_else(|| bucket_not_found(&bucket))?;
        objects.insert(locator.object_name.clone(), body);

        let request_id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        Ok(PutObjectResponse {
            etag: Some(uuid::Uuid::new_v4().to_string()),
            opc_request_id: request_id,
        })
    }
}

/// Hands the same store to every handler / 所有处理器共享同一个内存存储
impl StorageClientFactory for InMemoryStorage {
    fn factory_type(&self) -> &'static str {
        "memory"
    }

    fn create_client(&self, _config: &FunctionConfig) -> Result<Arc<dyn ObjectStorage>, InitError> {
        Ok(Arc::new(self.clone()))
    }
}
