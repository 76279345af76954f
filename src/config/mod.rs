pub mod config;
pub mod storage;

pub use config::Config;
pub use storage::Storage;
