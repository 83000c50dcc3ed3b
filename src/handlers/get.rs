use serde::{Deserialize, Serialize};

use super::{require_name, HandlerContext, HandlerError, FAILED};
use crate::config::FunctionConfig;
use crate::storage::{ObjectLocator, StorageClientFactory};

/// Input of the get function / 获取对象的输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetObjectInfo {
    pub bucket_name: String,
    pub name: String,
}

impl GetObjectInfo {
    pub fn new(bucket_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            name: name.into(),
        }
    }
}

/// Reads an object as text / 以文本读取对象
pub struct GetHandler {
    ctx: HandlerContext,
}

impl GetHandler {
    pub fn new(config: &FunctionConfig, factory: &dyn StorageClientFactory) -> Self {
        Self {
            ctx: HandlerContext::initialize("get", config, factory),
        }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.ctx
    }

    /// Fetch the object and join its lines with `\n` / 获取对象并按行以 `\n` 拼接
    pub async fn handle(&self, input: &GetObjectInfo) -> Result<String, HandlerError> {
        let client = self.ctx.client()?;
        require_name(&input.bucket_name, "bucketName")?;
        require_name(&input.name, "name")?;

        let locator = ObjectLocator::new(self.ctx.namespace(), &input.bucket_name, &input.name);
        tracing::info!("Getting content for object {} from bucket {}", input.name, input.bucket_name);

        let body = client.get_object(&locator).await.map_err(|e| {
            tracing::error!("Error fetching object {}: {}", locator, e);
            e
        })?;

        let content = join_lines(&String::from_utf8_lossy(&body));
        tracing::info!("Finished reading content for object {}", input.name);
        Ok(content)
    }

    /// Text form of a result / 结果的文本形式
    pub fn render(result: &Result<String, HandlerError>) -> String {
        match result {
            Ok(content) => content.clone(),
            Err(HandlerError::Uninitialized(_)) => FAILED.to_string(),
            Err(e) => format!("Error fetching object {}", e),
        }
    }

    /// `handle` collapsed into the text form / 返回文本形式的结果
    pub async fn handle_text(&self, input: &GetObjectInfo) -> String {
        Self::render(&self.handle(input).await)
    }
}

/// Lines joined by `\n`. A line ends at `\r\n`, `\n` or a lone `\r`, and a
/// trailing terminator does not add an empty line.
pub fn join_lines(text: &str) -> String {
    let body = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text);
    body.replace("\r\n", "\n").replace('\r', "\n")
}
