//! News proxy for MyDash
//!
//! Pulls Google News headlines through SerpApi and filters out articles the
//! dashboard cannot display.

pub mod provider;
pub mod types;

pub use provider::{news_cache_key, transform, NewsProvider};
pub use types::{NewsArticle, NewsResponse};
