//! MCP server surface.
//!
//! Exposes:
//! - tool `tech_info(weapon)`: three-tier equipment lookup
//! - resource template `equipment://{category}`: category member listing
//!
//! Lookup failures are returned as `{"error": ...}` payloads inside a normal
//! result, never as protocol errors. Only a URI outside the `equipment://`
//! scheme is rejected at the protocol level.

use std::{borrow::Cow, sync::Arc};

use cache_store::create_cache_store;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ListResourceTemplatesResult,
        ListResourcesResult, PaginatedRequestParam, RawResource, RawResourceTemplate,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    config::ServerConfig,
    error::{ConfigError, ConfigResult},
    fetcher::WikipediaFetcher,
    metrics::LookupMetrics,
    resolver::{category_payload, CategoryResolver, LookupResolver},
};

pub const SERVER_NAME: &str = "DefenseTech";

const CATEGORY_SCHEME: &str = "equipment://";
const CATEGORY_URI_TEMPLATE: &str = "equipment://{category}";
const JSON_MIME: &str = "application/json";

const INSTRUCTIONS: &str = "Defense equipment lookup. Call `tech_info` with a weapon name \
(e.g. \"BrahMos\") for its specifications or an encyclopedia summary; read \
`equipment://{category}` (missile, drone, tank, radar, ...) to list equipment by category.";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TechInfoRequest {
    /// The name of the weapon to look up, e.g. "BrahMos"
    pub weapon: String,
}

#[derive(Clone)]
pub struct DefenseTechServer {
    lookup: Arc<LookupResolver>,
    categories: Arc<CategoryResolver>,
    metrics: Arc<LookupMetrics>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DefenseTechServer {
    pub fn new(
        lookup: Arc<LookupResolver>,
        categories: Arc<CategoryResolver>,
        metrics: Arc<LookupMetrics>,
    ) -> Self {
        Self {
            lookup,
            categories,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Wire the catalog, cache backend and Wikipedia fetcher from `config`.
    pub async fn from_config(config: &ServerConfig) -> ConfigResult<Self> {
        config.validate()?;

        let catalog = Arc::new(config.load_catalog().await?);
        let cache = create_cache_store(&config.cache).map_err(ConfigError::Invalid)?;
        let fetcher = Arc::new(WikipediaFetcher::new(&config.fetcher)?);
        let metrics = Arc::new(LookupMetrics::new());

        info!(
            equipment = catalog.equipment_count(),
            cache_backend = cache.backend_name(),
            wikipedia = %fetcher.api_url(),
            "DefenseTech server configured"
        );

        let lookup = LookupResolver::new(catalog.clone(), cache, fetcher)
            .with_metrics(metrics.clone());
        let categories = CategoryResolver::new(catalog).with_metrics(metrics.clone());

        Ok(Self::new(Arc::new(lookup), Arc::new(categories), metrics))
    }

    pub fn metrics(&self) -> &Arc<LookupMetrics> {
        &self.metrics
    }

    #[tool(
        description = "Returns technical information about a defense weapon. Checks the local \
        database first, then previously saved Wikipedia results, and finally queries Wikipedia \
        for a short summary. The `source` field of the result is one of local, cache or \
        wikipedia; failures are reported in an `error` field."
    )]
    async fn tech_info(
        &self,
        Parameters(TechInfoRequest { weapon }): Parameters<TechInfoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.lookup.tech_info(&weapon).await;
        Ok(CallToolResult::success(vec![Content::json(&result)?]))
    }
}

/// Category named by an `equipment://{category}` URI, percent-decoded.
pub fn parse_category_uri(uri: &str) -> Option<Cow<'_, str>> {
    let category = uri.strip_prefix(CATEGORY_SCHEME)?.trim_end_matches('/');
    if category.is_empty() || category.contains('/') {
        return None;
    }
    urlencoding::decode(category).ok()
}

fn category_uri(category: &str) -> String {
    format!("{CATEGORY_SCHEME}{category}")
}

#[tool_handler]
impl ServerHandler for DefenseTechServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        info.server_info.name = SERVER_NAME.to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = self
            .categories
            .category_names()
            .map(|category| {
                let mut raw = RawResource::new(category_uri(category), category.to_string());
                raw.description = Some(format!("Equipment in the '{category}' category"));
                raw.mime_type = Some(JSON_MIME.to_string());
                raw.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let template = RawResourceTemplate {
            uri_template: CATEGORY_URI_TEMPLATE.to_string(),
            name: "equipment".to_string(),
            title: None,
            description: Some(
                "Returns all weapons or equipment under a given category, e.g. missile, drone, \
                 tank, radar."
                    .to_string(),
            ),
            mime_type: Some(JSON_MIME.to_string()),
        };

        Ok(ListResourceTemplatesResult {
            resource_templates: vec![template.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        let Some(category) = parse_category_uri(&uri) else {
            debug!(uri = %uri, "Rejected resource read outside the equipment scheme");
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {uri}"),
                Some(json!({ "uri": uri })),
            ));
        };

        let payload = category_payload(&self.categories.get_category_equipment(&category));
        let text = serde_json::to_string(&payload)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}
