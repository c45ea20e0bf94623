//! Object model handed to the writers.
//!
//! A request's result is materialized into this neutral shape before any
//! wire format is chosen, so every writer sees the same structure and
//! negotiation stays independent of the data source.

use serde::Serialize;
use serde_json::Value;

/// A named link on an entry or feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ODataLink {
    pub name: String,
    pub title: Option<String>,
    pub link_type: Option<String>,
    pub url: Option<String>,
}

impl ODataLink {
    pub fn new(name: &str, url: &str) -> Self {
        ODataLink {
            name: name.to_string(),
            title: None,
            link_type: None,
            url: Some(url.to_string()),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_link_type(mut self, link_type: &str) -> Self {
        self.link_type = Some(link_type.to_string());
        self
    }
}

/// A single property value on an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ODataProperty {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Value,
}

impl ODataProperty {
    pub fn new(name: &str, type_name: Option<&str>, value: Value) -> Self {
        ODataProperty {
            name: name.to_string(),
            type_name: type_name.map(str::to_string),
            value,
        }
    }
}

/// One entity instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ODataEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub type_name: Option<String>,
    pub etag: Option<String>,
    pub properties: Vec<ODataProperty>,
    pub links: Vec<ODataLink>,
    pub is_media_link_entry: bool,
}

impl ODataEntry {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A collection of entries plus feed-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ODataFeed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub entries: Vec<ODataEntry>,
    pub next_page_link: Option<ODataLink>,
    pub count: Option<i64>,
}

impl ODataFeed {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What the dispatcher hands off for serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ODataPayload {
    /// Nothing to serialize (e.g. service document requests).
    None,
    Entry(ODataEntry),
    Feed(ODataFeed),
    /// A `$links` projection.
    Links(Vec<ODataLink>),
    /// Raw bytes for `$value` and media resource targets.
    Binary(Vec<u8>),
}

impl ODataPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, ODataPayload::None)
    }

    /// True when the payload carries entity structure, the shape that is
    /// illegal against a `$links` modification segment.
    pub fn is_entity_model(&self) -> bool {
        matches!(self, ODataPayload::Entry(_) | ODataPayload::Feed(_))
    }
}

/// The service document: container title plus the entity sets it exposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDocument {
    pub title: String,
    pub collections: Vec<String>,
}

impl ServiceDocument {
    pub fn new(title: &str, collections: Vec<String>) -> Self {
        ServiceDocument {
            title: title.to_string(),
            collections,
        }
    }

    /// Build from a metadata provider's resource sets, in registration
    /// order.
    pub fn from_provider(provider: &dyn odata_metadata::MetadataProvider) -> Self {
        ServiceDocument {
            title: provider.container_name().to_string(),
            collections: provider
                .resource_sets()
                .into_iter()
                .map(|set| set.name().to_string())
                .collect(),
        }
    }
}
