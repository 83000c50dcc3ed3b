pub mod config;
pub mod handlers;
pub mod server;
pub mod storage;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use drivers::OciClientFactory;
pub use handlers::{GetHandler, ListHandler, PutHandler};
