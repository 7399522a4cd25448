mod common;

use cache_store::CacheBackend;
use common::MockWiki;
use defense_tech::{
    ConfigError, ConfigOverrides, DefenseTechServer, FetchError, ServerConfig, SummaryFetcher,
    WikipediaFetcher,
};
use rmcp::ServerHandler;
use tempfile::TempDir;

const CATALOG_YAML: &str = r#"
equipment:
  Rafale:
    type: Fighter Aircraft
    origin: France
    range_km: 3700
    speed: Mach 1.8
    used_by: [France, India, Egypt]
categories:
  " Fighter ": [Rafale]
"#;

#[tokio::test]
async fn server_builds_from_yaml_config() {
    let wiki = MockWiki::start().await;
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("catalog.yaml");
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&catalog_path, CATALOG_YAML).unwrap();
    std::fs::write(
        &config_path,
        format!(
            "catalog_path: {catalog}\ncache:\n  backend: file\n  path: {cache}\nfetcher:\n  api_url: {api}\n  timeout_secs: 5\n",
            catalog = catalog_path.display(),
            cache = dir.path().join("state/cache.json").display(),
            api = wiki.api_url,
        ),
    )
    .unwrap();

    let config = ServerConfig::from_file(&config_path).await.unwrap();
    assert_eq!(config.cache.backend, CacheBackend::File);
    assert_eq!(config.fetcher.api_url.as_deref(), Some(wiki.api_url.as_str()));

    let catalog = config.load_catalog().await.unwrap();
    assert!(catalog.equipment("Rafale").is_some());
    assert!(catalog.equipment("BrahMos").is_none());
    assert_eq!(
        catalog.category("fighter").map(<[String]>::to_vec),
        Some(vec!["Rafale".to_string()])
    );

    let server = DefenseTechServer::from_config(&config).await.unwrap();
    let info = server.get_info();
    assert_eq!(info.server_info.name, "DefenseTech");
    assert_eq!(server.metrics().snapshot().total_lookups, 0);
    assert_eq!(wiki.requests(), 0);
}

#[tokio::test]
async fn overrides_take_precedence_over_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "cache:\n  backend: file\n  path: cache.json\n").unwrap();

    let config = ServerConfig::from_file(&config_path)
        .await
        .unwrap()
        .with_overrides(ConfigOverrides {
            cache_backend: Some(CacheBackend::None),
            ..Default::default()
        });
    assert_eq!(config.cache.backend, CacheBackend::None);
    assert!(DefenseTechServer::from_config(&config).await.is_ok());
}

#[tokio::test]
async fn invalid_config_is_rejected_at_startup() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "fetcher:\n  summary_sentences: 0\n").unwrap();

    let config = ServerConfig::from_file(&config_path).await.unwrap();
    assert!(matches!(
        DefenseTechServer::from_config(&config).await,
        Err(ConfigError::Invalid(msg)) if msg.contains("summary_sentences")
    ));

    assert!(matches!(
        ServerConfig::from_file(dir.path().join("missing.yaml")).await,
        Err(ConfigError::Read { .. })
    ));
}

#[tokio::test]
async fn exact_title_fetch_without_auto_suggest() {
    let wiki = MockWiki::start().await;
    let mut config = wiki.fetcher_config();
    config.auto_suggest = false;
    let fetcher = WikipediaFetcher::new(&config).unwrap();

    let entry = fetcher.fetch_summary("Dassault Rafale").await.unwrap();
    assert_eq!(entry.url, "https://en.wikipedia.org/wiki/Dassault_Rafale");
    assert_eq!(wiki.requests(), 1);

    // Without the search step the raw name is queried and misses.
    assert_eq!(
        fetcher.fetch_summary("Rafale").await.unwrap_err(),
        FetchError::NotFound
    );
    assert_eq!(wiki.requests(), 2);

    // The default fetcher goes through search first.
    let suggested = wiki.fetcher().fetch_summary("Rafale").await.unwrap();
    assert_eq!(suggested, entry);
}
