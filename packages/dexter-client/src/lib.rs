//! Pure Dexter REST API client
//!
//! A minimal client for the Dexter entity-linking service. Every call goes
//! to `{url}/rest/{endpoint}`; the service does the linking, spotting and
//! relatedness scoring, this crate builds the requests, checks the
//! responses and turns annotations into a text partition.
//!
//! # Example
//!
//! ```rust,ignore
//! use dexter_client::{DexterClient, Segment};
//!
//! let client = DexterClient::new("http://dexter.isti.cnr.it/dexter")?;
//!
//! let segments = client
//!     .nice_annotate("Dexter is an American television drama.", 0.8)
//!     .await?;
//! for segment in &segments {
//!     match segment {
//!         Segment::Text(text) => print!("{}", text),
//!         Segment::Entity { mention, entity } => print!("[{}|{}]", mention, entity),
//!     }
//! }
//!
//! // Entities can be given by title or by id
//! let score = client.relatedness("Paris", 1234, "milnewitten", false).await?;
//! ```

pub mod config;
pub mod error;
pub mod params;
pub mod stitch;
pub mod types;
pub mod url;

pub use config::ClientConfig;
pub use error::{DexterError, Result};
pub use params::{ParamPrecedence, ParamValue, Params};
pub use stitch::stitch;
pub use types::*;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// Default relatedness measure.
pub const MILNE_WITTEN: &str = "milnewitten";

/// A connection to a Dexter REST API server.
#[derive(Debug, Clone)]
pub struct DexterClient {
    http_client: Client,
    base_url: String,
    default_params: Params,
    precedence: ParamPrecedence,
}

impl DexterClient {
    /// Create a client for the server at `url` with the standard default
    /// parameters (`lp=0`).
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(url))
    }

    /// Create from environment variables (see [`ClientConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = url::rest_base(&config.url)?;
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(client_build_error)?;

        Ok(Self {
            http_client,
            base_url,
            default_params: config.default_params,
            precedence: config.precedence,
        })
    }

    /// Validated base URL, ending in `/rest/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_params(&self) -> &Params {
        &self.default_params
    }

    /// Call an endpoint and return the raw JSON response.
    ///
    /// Default parameters are merged in first. A response that is exactly
    /// `{"error": message}` becomes [`DexterError::Service`]; anything else
    /// is returned untouched.
    pub async fn call(&self, endpoint: &str, params: Params, verb: Verb) -> Result<Value> {
        let start = std::time::Instant::now();
        let params = params.merged(&self.default_params, self.precedence);
        let pairs = params.to_pairs();
        let url = format!("{}{}", self.base_url, endpoint);

        let request = match verb {
            Verb::Get => self.http_client.get(&url).query(&pairs),
            Verb::Post => self.http_client.post(&url).form(&pairs),
        };

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, url = %url, "Dexter request failed");
            DexterError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, url = %url, "Dexter API error");
            return Err(DexterError::Http {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            DexterError::Parse(format!("Invalid JSON from {}: {}", url, e))
        })?;

        if let Some(message) = service_error(&value) {
            warn!(url = %url, error = %message, "Dexter service error");
            return Err(DexterError::Service { url, message });
        }

        debug!(
            endpoint,
            verb = %verb,
            duration_ms = start.elapsed().as_millis(),
            "Dexter call"
        );

        Ok(value)
    }

    /// Numeric id of `entity`, looking the title up if needed.
    pub async fn resolve_id(&self, entity: &EntityRef) -> Result<i64> {
        match entity {
            EntityRef::Id(id) => Ok(*id),
            EntityRef::Title(title) => {
                let id = self.get_id(title).await?;
                debug!(entity = %entity, id, "Resolved entity title");
                Ok(id)
            }
        }
    }

    /// Returns the ID of an entity.
    pub async fn get_id(&self, title: &str) -> Result<i64> {
        let response = self
            .call("get-id", Params::new().with("title", title), Verb::Get)
            .await?;
        let id = take_field(response, "get-id", "id")?;
        id.as_i64()
            .ok_or_else(|| DexterError::Parse(format!("get-id returned a non-integer id: {}", id)))
    }

    /// Annotate a document with Wikipedia entities.
    pub async fn annotate(&self, text: &str, options: &AnnotateOptions) -> Result<Value> {
        let params = Params::new()
            .with("text", text)
            .with("wn", options.wikiname)
            .with("min-conf", options.min_conf)
            .with("n", options.max_spots);
        self.call("annotate", params, Verb::Get).await
    }

    /// Annotate and decode the response into an [`AnnotatedDocument`].
    ///
    /// Spans only carry entity names when `wn` is set, so it is always sent
    /// as `true` here whatever `options.wikiname` says.
    pub async fn annotate_document(
        &self,
        text: &str,
        options: &AnnotateOptions,
    ) -> Result<AnnotatedDocument> {
        let options = options.clone().wikiname(true);
        let response = self.annotate(text, &options).await?;
        serde_json::from_value(response)
            .map_err(|e| DexterError::Parse(format!("Unexpected annotate response: {}", e)))
    }

    /// Partition `text` into plain segments and `(mention, entity name)`
    /// segments.
    pub async fn nice_annotate(&self, text: &str, min_conf: f64) -> Result<Vec<Segment>> {
        let options = AnnotateOptions::default().min_conf(min_conf);
        let document = self.annotate_document(text, &options).await?;
        Ok(document.stitch())
    }

    /// Detects all the mentions that could refer to an entity in the text.
    pub async fn spot(&self, text: &str, wikiname: bool) -> Result<Value> {
        let params = Params::new().with("text", text).with("wn", wikiname);
        let response = self.call("spot", params, Verb::Post).await?;
        take_field(response, "spot", "spots")
    }

    /// Provides all the spots that could refer to the given entity.
    pub async fn get_spots(&self, entity: impl Into<EntityRef>, wikiname: bool) -> Result<Value> {
        self.entity_field("get-spots", "spots", entity.into(), wikiname)
            .await
    }

    /// Provides the description of an entity.
    pub async fn get_desc(&self, entity: impl Into<EntityRef>, title_only: bool) -> Result<Value> {
        let id = self.resolve_id(&entity.into()).await?;
        let params = Params::new().with("id", id).with("title-only", title_only);
        self.call("get-desc", params, Verb::Get).await
    }

    /// Candidate entities a query could refer to.
    pub async fn get_candidates(&self, query: &str, max_candidates: u32) -> Result<Value> {
        let params = Params::new().with("query", query).with("n", max_candidates);
        self.call("get-candidates", params, Verb::Get).await
    }

    /// Semantic relatedness between two entities.
    pub async fn relatedness(
        &self,
        entity1: impl Into<EntityRef>,
        entity2: impl Into<EntityRef>,
        rel_measure: &str,
        wikiname: bool,
    ) -> Result<Value> {
        let e1 = self.resolve_id(&entity1.into()).await?;
        let e2 = self.resolve_id(&entity2.into()).await?;
        let params = Params::new()
            .with("e1", e1)
            .with("e2", e2)
            .with("rel", rel_measure)
            .with("wn", wikiname);
        self.call("relatedness", params, Verb::Get).await
    }

    /// Entities the given entity links to.
    pub async fn get_target_entities(
        &self,
        entity: impl Into<EntityRef>,
        wikiname: bool,
    ) -> Result<Value> {
        self.entity_field("get-target-entities", "outcomingEntities", entity.into(), wikiname)
            .await
    }

    /// Entities that link to the given entity.
    pub async fn get_source_entities(
        &self,
        entity: impl Into<EntityRef>,
        wikiname: bool,
    ) -> Result<Value> {
        self.entity_field("get-source-entities", "incomingEntities", entity.into(), wikiname)
            .await
    }

    /// Categories of an entity.
    pub async fn get_entity_categories(
        &self,
        entity: impl Into<EntityRef>,
        wikiname: bool,
    ) -> Result<Value> {
        self.entity_field("get-entity-categories", "parentCategories", entity.into(), wikiname)
            .await
    }

    /// Entities belonging to a category.
    pub async fn get_belonging_entities(
        &self,
        category: impl Into<EntityRef>,
        wikiname: bool,
    ) -> Result<Value> {
        self.entity_field("get-belonging-entities", "outcomingEntities", category.into(), wikiname)
            .await
    }

    /// Parent categories of a category.
    pub async fn get_parent_categories(
        &self,
        category: impl Into<EntityRef>,
        wikiname: bool,
    ) -> Result<Value> {
        self.entity_field("get-parent-categories", "parentCategories", category.into(), wikiname)
            .await
    }

    /// Child categories of a category.
    pub async fn get_child_categories(
        &self,
        category: impl Into<EntityRef>,
        wikiname: bool,
    ) -> Result<Value> {
        self.entity_field("get-child-categories", "childCategories", category.into(), wikiname)
            .await
    }

    /// Call an endpoint whose only argument is an entity/category id and
    /// extract `field` from the response.
    async fn entity_field(
        &self,
        endpoint: &'static str,
        field: &'static str,
        entity: EntityRef,
        wikiname: bool,
    ) -> Result<Value> {
        let id = self.resolve_id(&entity).await?;
        let params = Params::new().with("id", id).with("wn", wikiname);
        let response = self.call(endpoint, params, Verb::Get).await?;
        take_field(response, endpoint, field)
    }
}

/// Message of an `{"error": ...}` payload; only single-key objects count.
fn service_error(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get("error").map(|error| match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    })
}

fn client_build_error(e: reqwest::Error) -> DexterError {
    DexterError::Config(format!("Failed to create HTTP client: {}", e))
}

fn take_field(mut value: Value, endpoint: &'static str, field: &'static str) -> Result<Value> {
    value
        .get_mut(field)
        .map(Value::take)
        .ok_or(DexterError::MissingField { endpoint, field })
}
