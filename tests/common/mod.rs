//! Common test utilities: an in-process mock of the MediaWiki action API.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use defense_tech::{FetcherConfig, WikipediaFetcher};
use serde_json::{json, Value};
use tokio::{net::TcpListener, task::JoinHandle};

pub const API_PATH: &str = "/w/api.php";

/// Mock wiki knowing three titles:
/// - "Rafale" searches to the article "Dassault Rafale"
/// - "Patriot" is a disambiguation page with seven article links
/// - "Outage" makes the search endpoint answer HTTP 503
///
/// Any other search returns no hits.
pub struct MockWiki {
    pub api_url: String,
    requests: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockWiki {
    pub async fn start() -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(API_PATH, get(api))
            .with_state(requests.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api_url: format!("http://{addr}{API_PATH}"),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            api_url: Some(self.api_url.clone()),
            timeout_secs: Some(5),
            ..Default::default()
        }
    }

    pub fn fetcher(&self) -> WikipediaFetcher {
        WikipediaFetcher::new(&self.fetcher_config()).unwrap()
    }
}

impl Drop for MockWiki {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn api(
    State(requests): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    requests.fetch_add(1, Ordering::SeqCst);

    let param = |key: &str| params.get(key).map(String::as_str).unwrap_or_default();
    if param("action") != "query" || param("formatversion") != "2" {
        return (
            StatusCode::OK,
            Json(json!({"error": {"code": "badquery", "info": "unsupported request"}})),
        )
            .into_response();
    }

    if param("list") == "search" {
        return match param("srsearch") {
            "Outage" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            term => Json(search(term)).into_response(),
        };
    }

    match param("prop") {
        "links" => Json(links(param("titles"))).into_response(),
        _ => Json(page(param("titles"))).into_response(),
    }
}

fn search(term: &str) -> Value {
    let hits = match term {
        "Rafale" => vec![json!({"ns": 0, "title": "Dassault Rafale"})],
        "Patriot" => vec![json!({"ns": 0, "title": "Patriot"})],
        _ => Vec::new(),
    };
    json!({
        "batchcomplete": true,
        "query": {"searchinfo": {"totalhits": hits.len()}, "search": hits}
    })
}

fn page(title: &str) -> Value {
    let page = match title {
        "Dassault Rafale" => json!({
            "pageid": 331935,
            "ns": 0,
            "title": "Dassault Rafale",
            "fullurl": "https://en.wikipedia.org/wiki/Dassault_Rafale",
            "extract": "The Dassault Rafale is a French twin-engine, canard delta wing, multirole fighter aircraft.\n"
        }),
        "Patriot" => json!({
            "pageid": 23472,
            "ns": 0,
            "title": "Patriot",
            "fullurl": "https://en.wikipedia.org/wiki/Patriot",
            "pageprops": {"disambiguation": ""}
        }),
        other => json!({"ns": 0, "title": other, "missing": true}),
    };
    json!({"batchcomplete": true, "query": {"pages": [page]}})
}

fn links(title: &str) -> Value {
    let links: Vec<Value> = [
        "MIM-104 Patriot",
        "Patriotism",
        "Patriot (American Revolution)",
        "The Patriot (2000 film)",
        "New England Patriots",
        "Patriot Act",
        "Patriot League",
    ]
    .iter()
    .map(|t| json!({"ns": 0, "title": t}))
    .collect();
    json!({"query": {"pages": [{"ns": 0, "title": title, "links": links}]}})
}
