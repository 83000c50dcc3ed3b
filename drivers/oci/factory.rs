//! OCI 客户端工厂

use std::sync::Arc;

use super::client::ObjectStorageClient;
use super::credentials::CredentialLoader;
use crate::config::FunctionConfig;
use crate::storage::{InitError, ObjectStorage, StorageClientFactory};

/// 从配置加载凭证并创建绑定区域的客户端
pub struct OciClientFactory;

impl StorageClientFactory for OciClientFactory {
    fn factory_type(&self) -> &'static str {
        "oci"
    }

    fn create_client(&self, config: &FunctionConfig) -> Result<Arc<dyn ObjectStorage>, InitError> {
        let credentials = CredentialLoader::load(config)?;
        let client = ObjectStorageClient::new(
            &credentials,
            config.endpoint.as_deref(),
            config.request_timeout(),
        )?;

        tracing::info!(
            "OCI Object Storage client ready: region={}, endpoint={}",
            client.region(),
            client.endpoint()
        );
        Ok(Arc::new(client))
    }
}
