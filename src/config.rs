//! Application configuration module / 应用配置模块
//!
//! Configuration is read once from the environment into plain structs and passed
//! into each handler explicitly / 配置在启动时从环境变量读取一次，显式传入各处理器

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Fixed directory the function image ships its private key in / 私钥所在的固定目录
pub const DEFAULT_PRIVATE_KEY_DIR: &str = "/function";
/// Key file name used when `OCI_PRIVATE_KEY_FILE_NAME` is unset / 默认私钥文件名
pub const DEFAULT_PRIVATE_KEY_FILE_NAME: &str = "oci_api_key.pem";
/// Namespace used when `NAMESPACE` is unset / 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "objectstorage";
/// Default HTTP request timeout in seconds / 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const ENV_TENANCY: &str = "TENANCY";
pub const ENV_USER: &str = "USER";
pub const ENV_FINGERPRINT: &str = "FINGERPRINT";
pub const ENV_PASSPHRASE: &str = "PASSPHRASE";
pub const ENV_PRIVATE_KEY_FILE_NAME: &str = "OCI_PRIVATE_KEY_FILE_NAME";
pub const ENV_PRIVATE_KEY_DIR: &str = "OCI_PRIVATE_KEY_DIR";
pub const ENV_REGION: &str = "REGION";
pub const ENV_NAMESPACE: &str = "NAMESPACE";
pub const ENV_ENDPOINT: &str = "OCI_OBJECT_STORAGE_ENDPOINT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "OCI_REQUEST_TIMEOUT_SECS";

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener configuration / 监听配置
    pub server: ServerConfig,
    /// Object Storage function configuration / 对象存储函数配置
    pub function: FunctionConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Credentials and addressing for the Object Storage handlers / 对象存储处理器的凭证与寻址配置
///
/// Required values are kept as `Option` so that a missing one is reported by the
/// credential loader instead of failing here.
#[derive(Clone, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub tenancy: Option<String>,
    pub user: Option<String>,
    pub fingerprint: Option<String>,
    /// Only needed for encrypted keys / 仅加密私钥需要
    pub passphrase: Option<String>,
    pub region: Option<String>,
    pub private_key_file_name: String,
    pub private_key_dir: PathBuf,
    pub namespace: String,
    /// Overrides `https://objectstorage.{region}.oraclecloud.com` / 自定义端点
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            tenancy: None,
            user: None,
            fingerprint: None,
            passphrase: None,
            region: None,
            private_key_file_name: DEFAULT_PRIVATE_KEY_FILE_NAME.to_string(),
            private_key_dir: PathBuf::from(DEFAULT_PRIVATE_KEY_DIR),
            namespace: DEFAULT_NAMESPACE.to_string(),
            endpoint: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for FunctionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionConfig")
            .field("tenancy", &self.tenancy)
            .field("user", &self.user)
            .field("fingerprint", &self.fingerprint)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("private_key_file_name", &self.private_key_file_name)
            .field("private_key_dir", &self.private_key_dir)
            .field("namespace", &self.namespace)
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Read a value, treating blank strings as unset / 读取配置值，空白视为未设置
fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FunctionConfig {
    /// Build from the process environment / 从进程环境变量构建
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup / 从任意键值查找函数构建
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let request_timeout_secs = match non_blank(&lookup, ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    "Ignoring invalid {}={:?}, using {}s",
                    ENV_REQUEST_TIMEOUT_SECS,
                    raw,
                    DEFAULT_REQUEST_TIMEOUT_SECS
                );
                DEFAULT_REQUEST_TIMEOUT_SECS
            }),
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self {
            tenancy: non_blank(&lookup, ENV_TENANCY),
            user: non_blank(&lookup, ENV_USER),
            fingerprint: non_blank(&lookup, ENV_FINGERPRINT),
            passphrase: non_blank(&lookup, ENV_PASSPHRASE),
            region: non_blank(&lookup, ENV_REGION),
            private_key_file_name: non_blank(&lookup, ENV_PRIVATE_KEY_FILE_NAME)
                .unwrap_or(defaults.private_key_file_name),
            private_key_dir: non_blank(&lookup, ENV_PRIVATE_KEY_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.private_key_dir),
            namespace: non_blank(&lookup, ENV_NAMESPACE).unwrap_or(defaults.namespace),
            endpoint: non_blank(&lookup, ENV_ENDPOINT),
            request_timeout_secs,
        }
    }

    /// Full path of the private key file / 私钥文件完整路径
    ///
    /// The file name is always resolved under `private_key_dir`, a leading `/` is ignored.
    pub fn private_key_path(&self) -> PathBuf {
        self.private_key_dir.join(self.private_key_file_name.trim_start_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match non_blank(&lookup, "FN_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid FN_PORT={:?}, using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            host: non_blank(&lookup, "FN_HOST").unwrap_or(defaults.host),
            port,
        }
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from the process environment / 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig::from_lookup(&lookup),
            function: FunctionConfig::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_optional_values_missing() {
        let config = FunctionConfig::from_lookup(lookup_from(&[
            ("TENANCY", "ocid1.tenancy.oc1..aaa"),
            ("USER", "ocid1.user.oc1..bbb"),
            ("FINGERPRINT", "aa:bb"),
            ("REGION", "us-phoenix-1"),
        ]));

        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.private_key_file_name, DEFAULT_PRIVATE_KEY_FILE_NAME);
        assert_eq!(
            config.private_key_path(),
            PathBuf::from("/function/oci_api_key.pem")
        );
        assert_eq!(config.passphrase, None);
        assert_eq!(config.endpoint, None);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_blank_values_are_missing() {
        let config = FunctionConfig::from_lookup(lookup_from(&[
            ("TENANCY", "   "),
            ("NAMESPACE", ""),
            ("REGION", " us-ashburn-1 "),
        ]));

        assert_eq!(config.tenancy, None);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.region.as_deref(), Some("us-ashburn-1"));
    }

    #[test]
    fn test_overrides() {
        let config = FunctionConfig::from_lookup(lookup_from(&[
            ("OCI_PRIVATE_KEY_FILE_NAME", "key.pem"),
            ("OCI_PRIVATE_KEY_DIR", "/tmp/keys"),
            ("NAMESPACE", "mytenancy"),
            ("OCI_OBJECT_STORAGE_ENDPOINT", "http://127.0.0.1:9000"),
            ("OCI_REQUEST_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.private_key_path(), PathBuf::from("/tmp/keys/key.pem"));
        assert_eq!(config.namespace, "mytenancy");
        assert_eq!(config.endpoint.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_absolute_key_name_stays_in_key_dir() {
        let config = FunctionConfig::from_lookup(lookup_from(&[("OCI_PRIVATE_KEY_FILE_NAME", "/etc/passwd")]));
        assert_eq!(config.private_key_path(), PathBuf::from("/function/etc/passwd"));

        let config = FunctionConfig::from_lookup(lookup_from(&[("OCI_PRIVATE_KEY_FILE_NAME", "keys/a.pem")]));
        assert_eq!(config.private_key_path(), PathBuf::from("/function/keys/a.pem"));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OCI_REQUEST_TIMEOUT_SECS", "soon"),
            ("FN_PORT", "http"),
            ("FN_HOST", "127.0.0.1"),
        ]));

        assert_eq!(config.function.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.server.get_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_debug_redacts_passphrase() {
        let config = FunctionConfig::from_lookup(lookup_from(&[("PASSPHRASE", "hunter2")]));
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
    }
}
