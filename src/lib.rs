#[cfg(feature = "browser")]
pub mod browser;
pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod export;
pub mod models;
pub mod page;
pub mod runner;
pub mod scraper;
pub mod session;

pub use error::ScrapeError;
