use super::{require_name, HandlerContext, HandlerError};
use crate::config::FunctionConfig;
use crate::storage::{BucketLocator, StorageClientFactory};

/// Lists object names in a bucket / 列出存储桶中的对象名
pub struct ListHandler {
    ctx: HandlerContext,
}

impl ListHandler {
    pub fn new(config: &FunctionConfig, factory: &dyn StorageClientFactory) -> Self {
        Self {
            ctx: HandlerContext::initialize("list", config, factory),
        }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.ctx
    }

    /// Object names in service order / 按服务端返回顺序的对象名
    pub async fn handle(&self, bucket_name: &str) -> Result<Vec<String>, HandlerError> {
        let client = self.ctx.client()?;
        require_name(bucket_name, "bucketName")?;

        let bucket = BucketLocator::new(self.ctx.namespace(), bucket_name);
        let listed = client.list_objects(&bucket).await.map_err(|e| {
            tracing::error!("Error invoking object store API for bucket {}: {}", bucket, e);
            e
        })?;

        let names: Vec<String> = listed.objects.into_iter().map(|o| o.name).collect();
        tracing::info!("Got list of {} objects in bucket {}", names.len(), bucket_name);
        Ok(names)
    }

    /// Names, or an empty list on any failure / 失败时返回空列表
    pub async fn handle_or_empty(&self, bucket_name: &str) -> Vec<String> {
        self.handle(bucket_name).await.unwrap_or_default()
    }
}

/// Accepts a raw bucket name, a JSON string, or `{"bucketName": ...}` / 解析列举请求体
pub fn parse_bucket_name(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s.trim().to_string(),
        Ok(serde_json::Value::Object(obj)) => obj
            .get("bucketName")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string(),
        _ => trimmed.to_string(),
    }
}
