//! OCI 对象存储 HTTP 客户端
//!
//! 每个操作只发一次请求，不重试、不翻页。

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::{header, Client, Method, Response};
use url::Url;

use super::credentials::Credentials;
use super::signer::{http_date, RequestSigner};
use super::types::*;
use crate::storage::{
    BucketLocator, InitError, ListObjects, ObjectLocator, ObjectStorage, PutObjectResponse,
    StorageError,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// 对象存储客户端（绑定单个区域）
pub struct ObjectStorageClient {
    client: Client,
    endpoint: Url,
    region: String,
    signer: RequestSigner,
}

impl ObjectStorageClient {
    /// endpoint 为空时使用区域默认端点
    pub fn new(
        credentials: &Credentials,
        endpoint: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, InitError> {
        let signer = RequestSigner::new(credentials)?;

        let raw = endpoint
            .map(|e| e.to_string())
            .unwrap_or_else(|| regional_endpoint(&credentials.region));
        let endpoint = Url::parse(raw.trim_end_matches('/')).map_err(|e| InitError::InvalidEndpoint {
            endpoint: raw.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(InitError::InvalidEndpoint {
                endpoint: raw,
                reason: "expected an http(s) URL with a host".to_string(),
            });
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            region: credentials.region.clone(),
            signer,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_url(&self, path: &str) -> Result<Url, StorageError> {
        let url = format!("{}/{}", self.endpoint.as_str().trim_end_matches('/'), path);
        Url::parse(&url).map_err(|e| StorageError::InvalidInput(format!("invalid request URL: {}", e)))
    }

    /// /n/{namespace}/b/{bucket}/o
    fn bucket_url(&self, bucket: &BucketLocator) -> Result<Url, StorageError> {
        self.build_url(&format!(
            "n/{}/b/{}/o",
            path_segment(&bucket.namespace, "namespace")?,
            path_segment(&bucket.bucket_name, "bucket name")?
        ))
    }

    /// /n/{namespace}/b/{bucket}/o/{object}，对象名中的 `/` 也会被编码
    fn object_url(&self, locator: &ObjectLocator) -> Result<Url, StorageError> {
        self.build_url(&format!(
            "n/{}/b/{}/o/{}",
            path_segment(&locator.namespace, "namespace")?,
            path_segment(&locator.bucket_name, "bucket name")?,
            path_segment(&locator.object_name, "object name")?
        ))
    }

    /// 签名并发送请求，非 2xx 转换为 StorageError::Service
    async fn send(&self, method: Method, url: Url, body: Option<Bytes>) -> Result<Response, StorageError> {
        let date = http_date(Utc::now());
        let authorization = self.signer.authorization(&method, &url, &date)?;

        tracing::debug!("OCI {} {}", method, url);

        let mut req = self
            .client
            .request(method, url)
            .header(header::DATE, date)
            .header(header::AUTHORIZATION, authorization)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            req = req
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .body(body);
        }

        let resp = req.send().await?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        Err(error_from_response(resp).await)
    }
}

/// 编码单个路径段。`.` 与 `..`（编码后仍是点段）会被 URL 解析折叠，直接拒绝
fn path_segment(value: &str, what: &str) -> Result<String, StorageError> {
    if value == "." || value == ".." {
        return Err(StorageError::InvalidInput(format!("{} {:?} is not addressable", what, value)));
    }
    Ok(urlencoding::encode(value).into_owned())
}

fn header_value(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// 解析错误响应（JSON code/message，失败时使用原始文本）
async fn error_from_response(resp: Response) -> StorageError {
    let status = resp.status();
    let request_id = header_value(&resp, HEADER_OPC_REQUEST_ID);
    let text = resp.text().await.unwrap_or_default();

    let err = serde_json::from_str::<ErrResp>(&text).unwrap_or_default();
    let code = if err.code.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").replace(' ', "")
    } else {
        err.code
    };
    let message = if err.message.is_empty() {
        text.chars().take(200).collect()
    } else {
        err.message
    };

    StorageError::Service {
        status: status.as_u16(),
        code,
        message,
        request_id,
    }
}

#[async_trait]
impl ObjectStorage for ObjectStorageClient {
    fn name(&self) -> &str {
        "oci"
    }

    async fn get_object(&self, locator: &ObjectLocator) -> Result<Bytes, StorageError> {
        let url = self.object_url(locator)?;
        let resp = self.send(Method::GET, url, None).await?;
        Ok(resp.bytes().await?)
    }

    async fn list_objects(&self, bucket: &BucketLocator) -> Result<ListObjects, StorageError> {
        let url = self.bucket_url(bucket)?;
        let resp = self.send(Method::GET, url, None).await?;
        let text = resp.text().await?;
        let listed: ListObjects = serde_json::from_str(&text).map_err(|e| {
            StorageError::Decode(format!(
                "failed to parse ListObjects response: {} - {}",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })?;

        if let Some(next) = &listed.next_start_with {
            tracing::debug!("Listing of {} truncated, next page starts with {}", bucket, next);
        }
        Ok(listed)
    }

    async fn put_object(
        &self,
        locator: &ObjectLocator,
        body: Bytes,
    ) -> Result<PutObjectResponse, StorageError> {
        let url = self.object_url(locator)?;
        let resp = self.send(Method::PUT, url, Some(body)).await?;

        let opc_request_id = header_value(&resp, HEADER_OPC_REQUEST_ID)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StorageError::Decode("PutObject response has no opc-request-id".to_string()))?;

        Ok(PutObjectResponse {
            opc_request_id,
            etag: header_value(&resp, HEADER_ETAG),
        })
    }
}
