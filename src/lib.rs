pub mod config;
pub mod converter;
pub mod crawler;
pub mod error;

pub use config::{Config, Storage};
pub use converter::{convert_directory, convert_directory_to};
pub use crawler::{CrawlSummary, GoogleImageCrawler};
pub use error::{Error, Result};
