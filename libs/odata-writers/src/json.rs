//! The JSON writer family.
//!
//! Three capability profiles share the JSON rendering helpers:
//!
//! - [`JsonV1Writer`] serves `application/json` at V1 and the verbose
//!   (`odata=verbose`) flavor at V3.
//! - [`JsonV2Writer`] serves `application/json` at V2, wrapping feeds in
//!   the V2 `results` envelope.
//! - [`JsonLightWriter`] serves V3 only, one instance per metadata level,
//!   each matching only its own `odata=...metadata` parameter. Plain
//!   `application/json` at V3 therefore matches no JSON writer.

use crate::payload::{ODataEntry, ODataFeed, ODataLink, ODataPayload, ServiceDocument};
use crate::writer::ODataWriter;
use odata_common::mime::{self, MIME_APPLICATION_JSON};
use odata_common::{ODataError, Version};
use serde_json::{json, Map, Value};

fn entry_to_json(entry: &ODataEntry) -> Value {
    let mut object = Map::new();
    let mut metadata = Map::new();
    if let Some(id) = &entry.id {
        metadata.insert("uri".to_string(), json!(id));
    }
    if let Some(type_name) = &entry.type_name {
        metadata.insert("type".to_string(), json!(type_name));
    }
    if let Some(etag) = &entry.etag {
        metadata.insert("etag".to_string(), json!(etag));
    }
    if !metadata.is_empty() {
        object.insert("__metadata".to_string(), Value::Object(metadata));
    }
    for property in &entry.properties {
        object.insert(property.name.clone(), property.value.clone());
    }
    for link in &entry.links {
        object.insert(
            link.name.clone(),
            json!({ "__deferred": { "uri": link.url } }),
        );
    }
    Value::Object(object)
}

fn links_to_json(links: &[ODataLink]) -> Value {
    Value::Array(links.iter().map(|link| json!({ "uri": link.url })).collect())
}

fn render(value: &Value) -> odata_common::Result<String> {
    serde_json::to_string(value).map_err(|e| ODataError::internal_server_error(e.to_string()))
}

fn binary_rejected() -> ODataError {
    ODataError::internal_server_error("Binary payloads are streamed directly, not serialized.")
}

/// Verbose JSON, the V1 wire shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonV1Writer;

impl JsonV1Writer {
    pub fn new() -> Self {
        Self
    }

    fn payload_to_json(payload: &ODataPayload) -> odata_common::Result<Value> {
        match payload {
            ODataPayload::None => Ok(Value::Null),
            ODataPayload::Entry(entry) => Ok(entry_to_json(entry)),
            ODataPayload::Feed(feed) => Ok(Value::Array(
                feed.entries.iter().map(entry_to_json).collect(),
            )),
            ODataPayload::Links(links) => Ok(links_to_json(links)),
            ODataPayload::Binary(_) => Err(binary_rejected()),
        }
    }
}

impl ODataWriter for JsonV1Writer {
    fn can_handle(&self, version: Version, content_type: &str) -> bool {
        if !mime::media_type_matches(content_type, MIME_APPLICATION_JSON) {
            return false;
        }
        version == Version::V1
            || (version == Version::V3 && mime::has_parameter(content_type, "odata=verbose"))
    }

    fn write(&self, payload: &ODataPayload) -> odata_common::Result<String> {
        render(&json!({ "d": Self::payload_to_json(payload)? }))
    }

    fn write_service_document(&self, service: &ServiceDocument) -> odata_common::Result<String> {
        render(&json!({ "d": { "EntitySets": service.collections } }))
    }
}

/// V2 JSON: feeds gain the `results` envelope and inline count.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonV2Writer;

impl JsonV2Writer {
    pub fn new() -> Self {
        Self
    }

    fn payload_to_json(payload: &ODataPayload) -> odata_common::Result<Value> {
        match payload {
            ODataPayload::Feed(feed) => Ok(Self::feed_to_json(feed)),
            ODataPayload::Links(links) => Ok(json!({ "results": links_to_json(links) })),
            other => JsonV1Writer::payload_to_json(other),
        }
    }

    fn feed_to_json(feed: &ODataFeed) -> Value {
        let mut object = Map::new();
        object.insert(
            "results".to_string(),
            Value::Array(feed.entries.iter().map(entry_to_json).collect()),
        );
        if let Some(count) = feed.count {
            object.insert("__count".to_string(), json!(count.to_string()));
        }
        if let Some(next) = &feed.next_page_link {
            object.insert("__next".to_string(), json!(next.url));
        }
        Value::Object(object)
    }
}

impl ODataWriter for JsonV2Writer {
    fn can_handle(&self, version: Version, content_type: &str) -> bool {
        version == Version::V2 && mime::media_type_matches(content_type, MIME_APPLICATION_JSON)
    }

    fn write(&self, payload: &ODataPayload) -> odata_common::Result<String> {
        render(&json!({ "d": Self::payload_to_json(payload)? }))
    }

    fn write_service_document(&self, service: &ServiceDocument) -> odata_common::Result<String> {
        render(&json!({ "d": { "EntitySets": service.collections } }))
    }
}

/// JSON-Light metadata levels, V3 only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLightMetadataLevel {
    None,
    Minimal,
    Full,
}

impl JsonLightMetadataLevel {
    /// The content-type parameter this level answers to.
    pub fn mime_parameter(self) -> &'static str {
        match self {
            JsonLightMetadataLevel::None => "odata=nometadata",
            JsonLightMetadataLevel::Minimal => "odata=minimalmetadata",
            JsonLightMetadataLevel::Full => "odata=fullmetadata",
        }
    }
}

/// JSON-Light writer; one instance per metadata level.
#[derive(Debug, Clone)]
pub struct JsonLightWriter {
    level: JsonLightMetadataLevel,
    service_uri: String,
}

impl JsonLightWriter {
    pub fn new(level: JsonLightMetadataLevel, service_uri: &str) -> Self {
        JsonLightWriter {
            level,
            service_uri: service_uri.trim_end_matches('/').to_string(),
        }
    }

    pub fn level(&self) -> JsonLightMetadataLevel {
        self.level
    }

    fn metadata_uri(&self, fragment: &str) -> String {
        if fragment.is_empty() {
            format!("{}/$metadata", self.service_uri)
        } else {
            format!("{}/$metadata#{fragment}", self.service_uri)
        }
    }

    fn entry_to_json(&self, entry: &ODataEntry) -> Value {
        let mut object = Map::new();
        if self.level == JsonLightMetadataLevel::Full {
            if let Some(id) = &entry.id {
                object.insert("odata.id".to_string(), json!(id));
            }
            if let Some(type_name) = &entry.type_name {
                object.insert("odata.type".to_string(), json!(type_name));
            }
            if let Some(etag) = &entry.etag {
                object.insert("odata.etag".to_string(), json!(etag));
            }
        }
        for property in &entry.properties {
            object.insert(property.name.clone(), property.value.clone());
        }
        if self.level == JsonLightMetadataLevel::Full {
            for link in &entry.links {
                object.insert(
                    format!("{}@odata.navigationLinkUrl", link.name),
                    json!(link.url),
                );
            }
        }
        Value::Object(object)
    }

    fn with_metadata(&self, fragment: &str, mut object: Map<String, Value>) -> Value {
        if self.level != JsonLightMetadataLevel::None {
            let mut wrapped = Map::new();
            wrapped.insert("odata.metadata".to_string(), json!(self.metadata_uri(fragment)));
            wrapped.extend(object);
            return Value::Object(wrapped);
        }
        object.remove("odata.metadata");
        Value::Object(object)
    }
}

impl ODataWriter for JsonLightWriter {
    fn can_handle(&self, version: Version, content_type: &str) -> bool {
        version == Version::V3
            && mime::media_type_matches(content_type, MIME_APPLICATION_JSON)
            && mime::has_parameter(content_type, self.level.mime_parameter())
    }

    fn write(&self, payload: &ODataPayload) -> odata_common::Result<String> {
        let value = match payload {
            ODataPayload::None => self.with_metadata("", Map::new()),
            ODataPayload::Entry(entry) => {
                let fragment = entry.type_name.as_deref().unwrap_or("");
                match self.entry_to_json(entry) {
                    Value::Object(object) => self.with_metadata(fragment, object),
                    other => other,
                }
            }
            ODataPayload::Feed(feed) => {
                let mut object = Map::new();
                object.insert(
                    "value".to_string(),
                    Value::Array(feed.entries.iter().map(|e| self.entry_to_json(e)).collect()),
                );
                if let Some(count) = feed.count {
                    object.insert("odata.count".to_string(), json!(count.to_string()));
                }
                if let Some(next) = &feed.next_page_link {
                    object.insert("odata.nextLink".to_string(), json!(next.url));
                }
                let fragment = feed.title.as_deref().unwrap_or("");
                self.with_metadata(fragment, object)
            }
            ODataPayload::Links(links) => {
                let mut object = Map::new();
                object.insert("value".to_string(), links_to_json(links));
                self.with_metadata("", object)
            }
            ODataPayload::Binary(_) => return Err(binary_rejected()),
        };
        render(&value)
    }

    fn write_service_document(&self, service: &ServiceDocument) -> odata_common::Result<String> {
        let collections: Vec<Value> = service
            .collections
            .iter()
            .map(|name| json!({ "name": name, "url": name }))
            .collect();
        let mut object = Map::new();
        object.insert("value".to_string(), Value::Array(collections));
        render(&self.with_metadata("", object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odata_common::mime::{
        MIME_APPLICATION_JSON_FULL_META, MIME_APPLICATION_JSON_MINIMAL_META,
        MIME_APPLICATION_JSON_NO_META, MIME_APPLICATION_JSON_VERBOSE,
    };

    #[test]
    fn v1_writer_capability_profile() {
        let writer = JsonV1Writer::new();
        assert!(writer.can_handle(Version::V1, MIME_APPLICATION_JSON));
        assert!(writer.can_handle(Version::V3, MIME_APPLICATION_JSON_VERBOSE));
        assert!(!writer.can_handle(Version::V2, MIME_APPLICATION_JSON));
        assert!(!writer.can_handle(Version::V3, MIME_APPLICATION_JSON));
        assert!(!writer.can_handle(Version::V1, "application/atom+xml"));
    }

    #[test]
    fn v2_writer_capability_profile() {
        let writer = JsonV2Writer::new();
        assert!(writer.can_handle(Version::V2, MIME_APPLICATION_JSON));
        assert!(!writer.can_handle(Version::V1, MIME_APPLICATION_JSON));
        assert!(!writer.can_handle(Version::V3, MIME_APPLICATION_JSON));
    }

    #[test]
    fn json_light_levels_match_only_their_parameter() {
        let svc = "http://localhost/odata.svc";
        let none = JsonLightWriter::new(JsonLightMetadataLevel::None, svc);
        let minimal = JsonLightWriter::new(JsonLightMetadataLevel::Minimal, svc);
        let full = JsonLightWriter::new(JsonLightMetadataLevel::Full, svc);

        assert!(none.can_handle(Version::V3, MIME_APPLICATION_JSON_NO_META));
        assert!(minimal.can_handle(Version::V3, MIME_APPLICATION_JSON_MINIMAL_META));
        assert!(full.can_handle(Version::V3, MIME_APPLICATION_JSON_FULL_META));

        assert!(!none.can_handle(Version::V3, MIME_APPLICATION_JSON));
        assert!(!minimal.can_handle(Version::V3, MIME_APPLICATION_JSON));
        assert!(!minimal.can_handle(Version::V2, MIME_APPLICATION_JSON_MINIMAL_META));
    }

    #[test]
    fn v1_entry_renders_with_d_envelope() {
        let mut entry = ODataEntry::new();
        entry.id = Some("Customers('ALFKI')".to_string());
        entry.properties.push(crate::payload::ODataProperty::new(
            "Name",
            Some("Edm.String"),
            json!("Alfred"),
        ));
        let body = JsonV1Writer::new().write(&ODataPayload::Entry(entry)).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["d"]["Name"], "Alfred");
        assert_eq!(parsed["d"]["__metadata"]["uri"], "Customers('ALFKI')");
    }

    #[test]
    fn v2_feed_uses_results_envelope_with_count() {
        let mut feed = ODataFeed::new();
        feed.entries.push(ODataEntry::new());
        feed.count = Some(7);
        let body = JsonV2Writer::new().write(&ODataPayload::Feed(feed)).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["d"]["results"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["d"]["__count"], "7");
    }

    #[test]
    fn json_light_minimal_carries_metadata_uri() {
        let writer = JsonLightWriter::new(
            JsonLightMetadataLevel::Minimal,
            "http://localhost/odata.svc/",
        );
        let mut feed = ODataFeed::new();
        feed.title = Some("Customers".to_string());
        let body = writer.write(&ODataPayload::Feed(feed)).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            parsed["odata.metadata"],
            "http://localhost/odata.svc/$metadata#Customers"
        );
    }

    #[test]
    fn json_light_nometadata_omits_metadata_uri() {
        let writer =
            JsonLightWriter::new(JsonLightMetadataLevel::None, "http://localhost/odata.svc");
        let body = writer.write(&ODataPayload::Feed(ODataFeed::new())).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert!(parsed.get("odata.metadata").is_none());
    }
}
