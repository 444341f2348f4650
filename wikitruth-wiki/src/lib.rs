//! # wikitruth-wiki
//!
//! Wikipedia article-content fetching.
//!
//! [`WikipediaClient`] implements [`ArticleFetcher`](wikitruth_core::ArticleFetcher)
//! against the MediaWiki action API of each language edition and can look up
//! the titles of the same article in other editions.

pub mod client;
pub mod text;

pub use client::{
    DEFAULT_FETCH_TIMEOUT, MIN_ARTICLE_CHARS, USER_AGENT, WIKIPEDIA_API_TEMPLATE, WikipediaClient,
};
pub use text::{html_to_plain_text, wikitext_to_plain_text};
