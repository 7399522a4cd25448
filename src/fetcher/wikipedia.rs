//! Wikipedia summary fetcher backed by the MediaWiki action API.
//!
//! A lookup is up to three requests:
//! 1. optional one-result search, to pick up Wikipedia's spelling suggestion
//! 2. page query: intro extract, canonical URL and disambiguation flag
//! 3. for disambiguation pages only, the page's article links as candidates

use std::time::Duration;

use async_trait::async_trait;
use cache_store::CacheEntry;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{FetchError, SummaryFetcher, MAX_CANDIDATES};
use crate::{
    config::FetcherConfig,
    error::{ConfigError, ConfigResult},
};

pub struct WikipediaFetcher {
    client: Client,
    api_url: Url,
    summary_sentences: u32,
    auto_suggest: bool,
}

impl WikipediaFetcher {
    pub fn new(config: &FetcherConfig) -> ConfigResult<Self> {
        config.validate().map_err(ConfigError::Invalid)?;
        let api_url = config.api_endpoint().map_err(ConfigError::Invalid)?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url,
            summary_sentences: config.summary_sentences,
            auto_suggest: config.auto_suggest,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Other(format!(
                "Wikipedia API returned HTTP {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Other(format!("invalid Wikipedia API response: {e}")))?;
        check_api_error(&body)?;
        Ok(body)
    }

    async fn resolve_title(&self, name: &str) -> Result<String, FetchError> {
        if !self.auto_suggest {
            return Ok(name.to_string());
        }

        let body = self
            .query(&[
                ("list", "search"),
                ("srsearch", name),
                ("srlimit", "1"),
                ("srprop", ""),
                ("srinfo", "suggestion"),
            ])
            .await?;
        parse_search(&body).ok_or(FetchError::NotFound)
    }
}

#[async_trait]
impl SummaryFetcher for WikipediaFetcher {
    async fn fetch_summary(&self, name: &str) -> Result<CacheEntry, FetchError> {
        let title = self.resolve_title(name).await?;
        debug!(name = %name, title = %title, "Querying Wikipedia page");

        let sentences = self.summary_sentences.to_string();
        let body = self
            .query(&[
                ("prop", "extracts|info|pageprops"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("inprop", "url"),
                ("ppprop", "disambiguation"),
                ("redirects", "1"),
                ("titles", title.as_str()),
            ])
            .await?;

        match parse_page(&body)? {
            PageOutcome::Missing => Err(FetchError::NotFound),
            PageOutcome::Disambiguation { title } => {
                let body = self
                    .query(&[
                        ("prop", "links"),
                        ("plnamespace", "0"),
                        ("pllimit", "max"),
                        ("titles", title.as_str()),
                    ])
                    .await?;
                Err(FetchError::Ambiguous(parse_links(&body, MAX_CANDIDATES)))
            }
            PageOutcome::Article { summary, url } => Ok(CacheEntry::new(summary, url)),
        }
    }
}

#[derive(Debug, PartialEq)]
enum PageOutcome {
    Missing,
    Disambiguation { title: String },
    Article { summary: String, url: String },
}

fn malformed(what: &str) -> FetchError {
    FetchError::Other(format!("malformed Wikipedia API response: {what}"))
}

fn check_api_error(body: &Value) -> Result<(), FetchError> {
    if let Some(err) = body.get("error") {
        let code = err.get("code").and_then(Value::as_str).unwrap_or("unknown");
        let info = err.get("info").and_then(Value::as_str).unwrap_or("no details");
        return Err(FetchError::Other(format!(
            "Wikipedia API error {code}: {info}"
        )));
    }
    Ok(())
}

/// Suggested spelling if any, else the top hit.
fn parse_search(body: &Value) -> Option<String> {
    let query = body.get("query")?;
    query
        .pointer("/searchinfo/suggestion")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| query.pointer("/search/0/title").and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_page(body: &Value) -> Result<PageOutcome, FetchError> {
    let page = body
        .pointer("/query/pages/0")
        .ok_or_else(|| malformed("no pages"))?;

    let flag = |key: &str| page.get(key).and_then(Value::as_bool).unwrap_or(false);
    if flag("missing") || flag("invalid") {
        return Ok(PageOutcome::Missing);
    }

    let title = page
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("page without title"))?;
    if page.pointer("/pageprops/disambiguation").is_some() {
        return Ok(PageOutcome::Disambiguation {
            title: title.to_string(),
        });
    }

    let url = page
        .get("fullurl")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("page without fullurl"))?;
    let summary = page
        .get("extract")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();

    Ok(PageOutcome::Article {
        summary: summary.to_string(),
        url: url.to_string(),
    })
}

fn parse_links(body: &Value, limit: usize) -> Vec<String> {
    body.pointer("/query/pages/0/links")
        .and_then(Value::as_array)
        .map(|links| {
            links
                .iter()
                .filter_map(|link| link.get("title").and_then(Value::as_str))
                .take(limit)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_search_prefers_suggestion() {
        let body = json!({
            "query": {
                "searchinfo": {"suggestion": "rafale"},
                "search": [{"ns": 0, "title": "Dassault Rafale"}]
            }
        });
        assert_eq!(parse_search(&body).as_deref(), Some("rafale"));
    }

    #[test]
    fn test_search_falls_back_to_top_hit() {
        let body = json!({
            "query": {
                "searchinfo": {"totalhits": 812},
                "search": [{"ns": 0, "title": "Dassault Rafale"}]
            }
        });
        assert_eq!(parse_search(&body).as_deref(), Some("Dassault Rafale"));
    }

    #[test]
    fn test_search_without_hits() {
        let body = json!({"query": {"searchinfo": {"totalhits": 0}, "search": []}});
        assert_eq!(parse_search(&body), None);
    }

    #[test]
    fn test_page_article() {
        let body = json!({
            "batchcomplete": true,
            "query": {
                "pages": [{
                    "pageid": 331935,
                    "ns": 0,
                    "title": "Dassault Rafale",
                    "fullurl": "https://en.wikipedia.org/wiki/Dassault_Rafale",
                    "extract": "The Dassault Rafale is a French twin-engine fighter. It is built by Dassault.\n"
                }]
            }
        });
        assert_eq!(
            parse_page(&body).unwrap(),
            PageOutcome::Article {
                summary: "The Dassault Rafale is a French twin-engine fighter. It is built by Dassault."
                    .to_string(),
                url: "https://en.wikipedia.org/wiki/Dassault_Rafale".to_string(),
            }
        );
    }

    #[test]
    fn test_page_missing_and_invalid() {
        let missing = json!({"query": {"pages": [{"ns": 0, "title": "Zzyzx-9", "missing": true}]}});
        assert_eq!(parse_page(&missing).unwrap(), PageOutcome::Missing);

        let invalid = json!({"query": {"pages": [{"title": "[x]", "invalid": true, "invalidreason": "bad"}]}});
        assert_eq!(parse_page(&invalid).unwrap(), PageOutcome::Missing);
    }

    #[test]
    fn test_page_disambiguation() {
        let body = json!({
            "query": {
                "pages": [{
                    "ns": 0,
                    "title": "Patriot",
                    "pageprops": {"disambiguation": ""},
                    "fullurl": "https://en.wikipedia.org/wiki/Patriot"
                }]
            }
        });
        assert_eq!(
            parse_page(&body).unwrap(),
            PageOutcome::Disambiguation {
                title: "Patriot".to_string()
            }
        );
    }

    #[test]
    fn test_page_malformed() {
        assert!(matches!(
            parse_page(&json!({"batchcomplete": true})),
            Err(FetchError::Other(msg)) if msg.contains("no pages")
        ));
        assert!(matches!(
            parse_page(&json!({"query": {"pages": [{"title": "X"}]}})),
            Err(FetchError::Other(msg)) if msg.contains("fullurl")
        ));
    }

    #[test]
    fn test_links_are_capped() {
        let links: Vec<Value> = (1..=8)
            .map(|i| json!({"ns": 0, "title": format!("Patriot {i}")}))
            .collect();
        let body = json!({"query": {"pages": [{"title": "Patriot", "links": links}]}});

        let candidates = parse_links(&body, MAX_CANDIDATES);
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0], "Patriot 1");
        assert_eq!(candidates[4], "Patriot 5");

        assert!(parse_links(&json!({"query": {"pages": [{"title": "P"}]}}), 5).is_empty());
    }

    #[test]
    fn test_api_error_object() {
        let body = json!({"error": {"code": "maxlag", "info": "Waiting for a database server"}});
        assert_eq!(
            check_api_error(&body),
            Err(FetchError::Other(
                "Wikipedia API error maxlag: Waiting for a database server".to_string()
            ))
        );
        assert!(check_api_error(&json!({"query": {}})).is_ok());
    }

    #[test]
    fn test_new_uses_configured_endpoint() {
        let fetcher = WikipediaFetcher::new(&FetcherConfig {
            language: "de".to_string(),
            timeout_secs: Some(10),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            fetcher.api_url().as_str(),
            "https://de.wikipedia.org/w/api.php"
        );

        assert!(WikipediaFetcher::new(&FetcherConfig {
            summary_sentences: 42,
            ..Default::default()
        })
        .is_err());
    }
}
