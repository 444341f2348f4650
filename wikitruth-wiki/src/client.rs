//! MediaWiki action API client.

use crate::text::{html_to_plain_text, wikitext_to_plain_text};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use wikitruth_core::{ArticleContent, ArticleFetcher, LanguageTitle, Result, WikiTruthError};
use wikitruth_telemetry::{debug, info, warn};

/// Endpoint template; `{lang}` is replaced with the edition's language code.
pub const WIKIPEDIA_API_TEMPLATE: &str = "https://{lang}.wikipedia.org/w/api.php";

pub const USER_AGENT: &str = "WikiTruth/1.0 (https://wikitruth.app)";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Articles shorter than this are treated as unusable stubs.
pub const MIN_ARTICLE_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    revisions: Vec<Revision>,
    #[serde(default)]
    langlinks: Vec<LangLink>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    #[serde(default)]
    slots: Option<Slots>,
}

#[derive(Debug, Deserialize)]
struct Slots {
    main: Option<Slot>,
}

#[derive(Debug, Deserialize)]
struct Slot {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    parse: Option<Parsed>,
}

#[derive(Debug, Deserialize)]
struct Parsed {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LangLink {
    lang: String,
    title: String,
}

impl Page {
    fn wikitext(&self) -> Option<&str> {
        self.revisions
            .first()
            .and_then(|revision| revision.slots.as_ref())
            .and_then(|slots| slots.main.as_ref())
            .and_then(|slot| slot.content.as_deref())
    }
}

/// Fetches plain article text from Wikipedia.
///
/// The plain-text extract is preferred; when it is missing or shorter than
/// [`MIN_ARTICLE_CHARS`], the page's wikitext is cleaned up instead. If that
/// is still too short, the rendered HTML from the parse API is used.
///
/// # Example
///
/// ```rust,ignore
/// use wikitruth_wiki::WikipediaClient;
/// use wikitruth_core::ArticleFetcher;
///
/// let client = WikipediaClient::new()?;
/// let article = client.fetch("Napoléon Ier", "fr").await?;
/// ```
#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    endpoint_template: String,
}

impl WikipediaClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| WikiTruthError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoint_template: WIKIPEDIA_API_TEMPLATE.to_string() })
    }

    /// Point the client at another MediaWiki installation. The template must
    /// contain `{lang}`.
    #[must_use]
    pub fn with_endpoint_template(mut self, template: impl Into<String>) -> Self {
        self.endpoint_template = template.into();
        self
    }

    fn api_url(&self, language: &str) -> Result<String> {
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(WikiTruthError::InvalidRequest(format!(
                "invalid language code '{language}'"
            )));
        }
        Ok(self.endpoint_template.replace("{lang}", language))
    }

    async fn get_json<T: DeserializeOwned>(&self, language: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.api_url(language)?;
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("format", "json"), ("formatversion", "2")])
            .send()
            .await
            .map_err(|e| WikiTruthError::Fetch(format!("{language} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiTruthError::Fetch(format!("{language} Wikipedia returned HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| WikiTruthError::Fetch(format!("{language} response unreadable: {e}")))
    }

    async fn query(&self, language: &str, params: &[(&str, &str)]) -> Result<Query> {
        let body: QueryResponse = self.get_json(language, params).await?;
        body.query
            .ok_or_else(|| WikiTruthError::Fetch(format!("{language} response had no query result")))
    }

    /// Plain text of the page as rendered by the parse API.
    async fn rendered_text(&self, title: &str, language: &str) -> Result<Option<String>> {
        let body: ParseResponse = self
            .get_json(
                language,
                &[
                    ("action", "parse"),
                    ("page", title),
                    ("prop", "text"),
                    ("disabletoc", "1"),
                    ("disableeditsection", "1"),
                    ("redirects", "1"),
                ],
            )
            .await?;

        Ok(body.parse.and_then(|parsed| parsed.text).map(|html| html_to_plain_text(&html)))
    }

    /// Titles of the same article in other language editions.
    pub async fn language_links(&self, title: &str, language: &str) -> Result<Vec<LanguageTitle>> {
        let query = self
            .query(
                language,
                &[("action", "query"), ("titles", title), ("prop", "langlinks"), ("lllimit", "500")],
            )
            .await?;

        let links = query
            .pages
            .into_iter()
            .next()
            .map(|page| page.langlinks)
            .unwrap_or_default()
            .into_iter()
            .map(|link| LanguageTitle::new(link.lang, link.title))
            .collect::<Vec<_>>();

        debug!(title, language, links = links.len(), "language links fetched");
        Ok(links)
    }
}

#[async_trait]
impl ArticleFetcher for WikipediaClient {
    async fn fetch(&self, title: &str, language: &str) -> Result<ArticleContent> {
        let query = self
            .query(
                language,
                &[
                    ("action", "query"),
                    ("titles", title),
                    ("prop", "extracts|revisions"),
                    ("explaintext", "1"),
                    ("exsectionformat", "plain"),
                    ("rvprop", "content"),
                    ("rvslots", "main"),
                    ("redirects", "1"),
                ],
            )
            .await?;

        let page = query.pages.into_iter().next().ok_or_else(|| {
            WikiTruthError::Fetch(format!("Article \"{title}\" not found in {language} Wikipedia"))
        })?;

        if page.missing || page.invalid {
            return Err(WikiTruthError::Fetch(format!(
                "Article \"{title}\" not found in {language} Wikipedia"
            )));
        }

        let extract = page.extract.as_deref().map(str::trim).unwrap_or_default();
        let mut text = if extract.chars().count() >= MIN_ARTICLE_CHARS {
            extract.to_string()
        } else {
            page.wikitext().map(wikitext_to_plain_text).unwrap_or_else(|| extract.to_string())
        };

        if text.chars().count() < MIN_ARTICLE_CHARS {
            match self.rendered_text(title, language).await {
                Ok(Some(rendered)) if rendered.chars().count() > text.chars().count() => {
                    debug!(language, title, "Using rendered HTML");
                    text = rendered;
                }
                Ok(_) => {}
                Err(err) => warn!(language, title, error = %err, "Parse API fallback failed"),
            }
        }

        let length = text.chars().count();
        if length < MIN_ARTICLE_CHARS {
            return Err(WikiTruthError::Fetch(format!(
                "Article \"{title}\" has insufficient content in {language} ({length} chars)"
            )));
        }

        let resolved_title = page.title.unwrap_or_else(|| title.to_string());
        info!(language, title = %resolved_title, chars = length, "Fetched article");

        Ok(ArticleContent::new(language, resolved_title, text))
    }
}
