//! 对象存储 REST 接口数据类型

use serde::Deserialize;

pub const HEADER_OPC_REQUEST_ID: &str = "opc-request-id";
pub const HEADER_ETAG: &str = "etag";

/// 错误响应体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrResp {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// 区域默认端点
pub fn regional_endpoint(region: &str) -> String {
    format!("https://objectstorage.{}.oraclecloud.com", region)
}
