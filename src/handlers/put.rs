use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{require_name, HandlerContext, HandlerError, FAILED};
use crate::config::FunctionConfig;
use crate::storage::{ObjectLocator, StorageClientFactory};

/// Input of the put function / 上传对象的输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectInfo {
    pub bucket_name: String,
    pub name: String,
    /// Absent content is rejected; an empty string uploads an empty object
    pub content: Option<String>,
}

impl ObjectInfo {
    pub fn new(
        bucket_name: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            name: name.into(),
            content: Some(content.into()),
        }
    }
}

/// Acknowledgment of an accepted upload / 上传确认
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutAck {
    pub bucket_name: String,
    pub object_name: String,
    pub opc_request_id: String,
}

impl fmt::Display for PutAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully submitted Put request for object {} in bucket {}. OPC request ID is {}",
            self.object_name, self.bucket_name, self.opc_request_id
        )
    }
}

/// Uploads text content as an object / 以对象形式上传文本
pub struct PutHandler {
    ctx: HandlerContext,
}

impl PutHandler {
    pub fn new(config: &FunctionConfig, factory: &dyn StorageClientFactory) -> Self {
        Self {
            ctx: HandlerContext::initialize("put", config, factory),
        }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.ctx
    }

    /// Upload `content` UTF-8 encoded / 以 UTF-8 编码上传
    pub async fn handle(&self, input: &ObjectInfo) -> Result<PutAck, HandlerError> {
        let client = self.ctx.client()?;
        require_name(&input.bucket_name, "bucketName")?;
        require_name(&input.name, "name")?;
        let content = input
            .content
            .as_deref()
            .ok_or_else(|| HandlerError::InvalidInput("content must be present".to_string()))?;

        let locator = ObjectLocator::new(self.ctx.namespace(), &input.bucket_name, &input.name);
        let body = Bytes::copy_from_slice(content.as_bytes());

        let resp = client.put_object(&locator, body).await.map_err(|e| {
            tracing::error!("Error storing object {} in bucket: {}", locator, e);
            e
        })?;

        let ack = PutAck {
            bucket_name: input.bucket_name.clone(),
            object_name: input.name.clone(),
            opc_request_id: resp.opc_request_id,
        };
        tracing::info!("{}", ack);
        Ok(ack)
    }

    /// Text form of a result / 结果的文本形式
    pub fn render(result: &Result<PutAck, HandlerError>) -> String {
        match result {
            Ok(ack) => ack.to_string(),
            Err(HandlerError::Uninitialized(_)) => FAILED.to_string(),
            Err(e) => format!("Error storing object in bucket {}", e),
        }
    }

    pub async fn handle_text(&self, input: &ObjectInfo) -> String {
        Self::render(&self.handle(input).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;
    use crate::handlers::{GetHandler, GetObjectInfo, ListHandler};
    use crate::storage::{BucketLocator, ErrorKind};

    #[tokio::test]
    async fn test_put_returns_request_id() {
        let store = store().await;
        let handler = PutHandler::new(&config(), &store);

        let ack = handler.handle(&ObjectInfo::new("demo", "hello.txt", "hi")).await.unwrap();
        assert!(!ack.opc_request_id.is_empty());

        let text = PutHandler::render(&Ok(ack.clone()));
        assert!(text.contains("hello.txt"));
        assert!(text.contains(&ack.opc_request_id));
        assert!(text.starts_with("Successfully submitted Put request"));
    }

    #[tokio::test]
    async fn test_put_then_get_and_list() {
        let store = store().await;
        let put = PutHandler::new(&config(), &store);
        let get = GetHandler::new(&config(), &store);
        let list = ListHandler::new(&config(), &store);

        let content = "héllo wörld\nsecond line";
        put.handle(&ObjectInfo::new("demo", "round.txt", content)).await.unwrap();
        put.handle(&ObjectInfo::new("demo", "round.txt", content)).await.unwrap();

        assert_eq!(get.handle_text(&GetObjectInfo::new("demo", "round.txt")).await, content);

        let names = list.handle("demo").await.unwrap();
        assert_eq!(names.iter().filter(|n| n.as_str() == "round.txt").count(), 1);
    }

    #[tokio::test]
    async fn test_put_failures() {
        let store = store().await;
        let handler = PutHandler::new(&config(), &store);

        let err = handler.handle(&ObjectInfo::new("nope", "a.txt", "x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let text = handler.handle_text(&ObjectInfo::new("nope", "a.txt", "x")).await;
        assert!(text.starts_with("Error storing object in bucket "));

        let broken = PutHandler::new(&config(), &BrokenFactory);
        assert_eq!(broken.handle_text(&ObjectInfo::new("demo", "a.txt", "x")).await, FAILED);
    }

    #[test]
    fn test_input_json_shape() {
        let input: ObjectInfo =
            serde_json::from_str(r#"{"bucketName":"demo","name":"hello.txt","content":"hi"}"#).unwrap();
        assert_eq!(input.content.as_deref(), Some("hi"));

        let partial: ObjectInfo = serde_json::from_str(r#"{"bucketName":"demo"}"#).unwrap();
        assert!(partial.name.is_empty());
        assert!(partial.content.is_none());
    }

    #[tokio::test]
    async fn test_missing_content_rejected() {
        let store = store().await;
        let handler = PutHandler::new(&config(), &store);

        let input: ObjectInfo = serde_json::from_str(r#"{"bucketName":"demo","name":"a.txt"}"#).unwrap();
        let err = handler.handle(&input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(store.object_count(&BucketLocator::new(NAMESPACE, "demo")).await, 0);

        handler.handle(&ObjectInfo::new("demo", "empty.txt", "")).await.unwrap();
        assert_eq!(store.object_count(&BucketLocator::new(NAMESPACE, "demo")).await, 1);
    }
}
