//! OCI Object Storage driver / OCI 对象存储驱动

pub mod client;
pub mod credentials;
pub mod factory;
pub mod signer;
pub mod types;

pub use client::ObjectStorageClient;
pub use credentials::{CredentialLoader, Credentials};
pub use factory::OciClientFactory;
pub use signer::RequestSigner;
