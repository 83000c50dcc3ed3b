//! OCI HTTP 请求签名（draft-cavage-http-signatures, rsa-sha256）
//!
//! 签名头固定为 `date (request-target) host`。对象上传（PutObject）的请求体
//! 不参与签名，服务端对对象存储的上传请求豁免 body 相关签名头。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::Method;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use url::Url;

use super::credentials::Credentials;
use crate::storage::{InitError, StorageError};

/// 参与签名的头（顺序即签名串顺序）
pub const SIGNED_HEADERS: &str = "date (request-target) host";

/// 请求签名器
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl RequestSigner {
    pub fn new(credentials: &Credentials) -> Result<Self, InitError> {
        let private_key = parse_private_key(
            &credentials.private_key_bytes,
            credentials.passphrase.as_deref(),
        )?;
        Ok(Self {
            key_id: credentials.key_id(),
            signing_key: SigningKey::<Sha256>::new(private_key),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// 生成 Authorization 头的值
    pub fn authorization(&self, method: &Method, url: &Url, date: &str) -> Result<String, StorageError> {
        let signing_string = signing_string(method, url, date);
        let signature: Signature = self
            .signing_key
            .try_sign(signing_string.as_bytes())
            .map_err(|e| StorageError::Signing(e.to_string()))?;

        Ok(format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
            self.key_id,
            SIGNED_HEADERS,
            STANDARD.encode(signature.to_bytes())
        ))
    }
}

/// 解析 PEM 私钥：PKCS#8、加密 PKCS#8、未加密 PKCS#1
pub fn parse_private_key(bytes: &[u8], passphrase: Option<&str>) -> Result<RsaPrivateKey, InitError> {
    let pem = std::str::from_utf8(bytes)
        .map_err(|_| InitError::InvalidKey("private key is not PEM text".to_string()))?;

    if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") {
        let passphrase = passphrase
            .filter(|p| !p.is_empty())
            .ok_or_else(|| InitError::InvalidKey("encrypted private key requires PASSPHRASE".to_string()))?;
        return RsaPrivateKey::from_pkcs8_encrypted_pem(pem, passphrase)
            .map_err(|e| InitError::InvalidKey(format!("failed to decrypt PKCS#8 key: {}", e)));
    }

    if pem.contains("BEGIN RSA PRIVATE KEY") {
        if pem.contains("Proc-Type: 4,ENCRYPTED") {
            return Err(InitError::InvalidKey(
                "legacy encrypted PKCS#1 keys are not supported, convert with `openssl pkcs8 -topk8`".to_string(),
            ));
        }
        return RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| InitError::InvalidKey(format!("failed to parse PKCS#1 key: {}", e)));
    }

    if pem.contains("BEGIN PRIVATE KEY") {
        return RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| InitError::InvalidKey(format!("failed to parse PKCS#8 key: {}", e)));
    }

    Err(InitError::InvalidKey("unrecognised private key format".to_string()))
}

/// 签名串，各行以 `\n` 连接
pub fn signing_string(method: &Method, url: &Url, date: &str) -> String {
    format!(
        "date: {}\n(request-target): {} {}\nhost: {}",
        date,
        method.as_str().to_lowercase(),
        request_target(url),
        host_header(url)
    )
}

/// path + query，保持与实际发送的一致（已编码）
pub fn request_target(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

/// Host 头：非默认端口时带端口
pub fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// RFC 7231 日期格式
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
