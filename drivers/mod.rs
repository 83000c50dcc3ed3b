// Driver package / 驱动包
pub mod oci;

pub use oci::OciClientFactory;
