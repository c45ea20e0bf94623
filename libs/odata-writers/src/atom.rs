//! The Atom writer.
//!
//! Atom is the version-independent default format: it answers to
//! `application/atom+xml` and plain `application/xml` at every protocol
//! version, which is why it is registered first and acts as the fallback
//! when a client sends a bare XML accept header.

use crate::payload::{ODataEntry, ODataFeed, ODataPayload, ServiceDocument};
use crate::writer::ODataWriter;
use odata_common::mime::{
    self, MIME_APPLICATION_ATOM, MIME_APPLICATION_ATOMSERVICE, MIME_APPLICATION_XML,
};
use odata_common::{ODataError, Version};
use std::fmt::Write;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
const DATA_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2007/08/dataservices";
const METADATA_NAMESPACE: &str =
    "http://schemas.microsoft.com/ado/2007/08/dataservices/metadata";

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AtomWriter;

impl AtomWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_entry(out: &mut String, entry: &ODataEntry) {
        let _ = write!(
            out,
            "<entry xmlns=\"{ATOM_NAMESPACE}\" xmlns:d=\"{DATA_NAMESPACE}\" xmlns:m=\"{METADATA_NAMESPACE}\">"
        );
        if let Some(id) = &entry.id {
            let _ = write!(out, "<id>{}</id>", escape_xml(id));
        }
        if let Some(title) = &entry.title {
            let _ = write!(out, "<title type=\"text\">{}</title>", escape_xml(title));
        }
        if let Some(type_name) = &entry.type_name {
            let _ = write!(
                out,
                "<category term=\"{}\" scheme=\"http://schemas.microsoft.com/ado/2007/08/dataservices/scheme\"/>",
                escape_xml(type_name)
            );
        }
        for link in &entry.links {
            let _ = write!(
                out,
                "<link rel=\"related\" title=\"{}\" href=\"{}\"/>",
                escape_xml(&link.name),
                escape_xml(link.url.as_deref().unwrap_or(""))
            );
        }
        out.push_str("<content type=\"application/xml\"><m:properties>");
        for property in &entry.properties {
            let name = escape_xml(&property.name);
            if property.value.is_null() {
                let _ = write!(out, "<d:{name} m:null=\"true\"/>");
            } else {
                let value = match &property.value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let _ = write!(out, "<d:{name}>{}</d:{name}>", escape_xml(&value));
            }
        }
        out.push_str("</m:properties></content></entry>");
    }

    fn write_feed(out: &mut String, feed: &ODataFeed) {
        let _ = write!(
            out,
            "<feed xmlns=\"{ATOM_NAMESPACE}\" xmlns:d=\"{DATA_NAMESPACE}\" xmlns:m=\"{METADATA_NAMESPACE}\">"
        );
        if let Some(id) = &feed.id {
            let _ = write!(out, "<id>{}</id>", escape_xml(id));
        }
        if let Some(title) = &feed.title {
            let _ = write!(out, "<title type=\"text\">{}</title>", escape_xml(title));
        }
        if let Some(count) = feed.count {
            let _ = write!(out, "<m:count>{count}</m:count>");
        }
        for entry in &feed.entries {
            Self::write_entry(out, entry);
        }
        if let Some(next) = &feed.next_page_link {
            let _ = write!(
                out,
                "<link rel=\"next\" href=\"{}\"/>",
                escape_xml(next.url.as_deref().unwrap_or(""))
            );
        }
        out.push_str("</feed>");
    }
}

impl ODataWriter for AtomWriter {
    fn can_handle(&self, _version: Version, content_type: &str) -> bool {
        mime::media_type_matches(content_type, MIME_APPLICATION_ATOM)
            || mime::media_type_matches(content_type, MIME_APPLICATION_ATOMSERVICE)
            || mime::media_type_matches(content_type, MIME_APPLICATION_XML)
    }

    fn write(&self, payload: &ODataPayload) -> odata_common::Result<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
        match payload {
            ODataPayload::None => {}
            ODataPayload::Entry(entry) => Self::write_entry(&mut out, entry),
            ODataPayload::Feed(feed) => Self::write_feed(&mut out, feed),
            ODataPayload::Links(links) => {
                out.push_str("<links>");
                for link in links {
                    let _ = write!(
                        &mut out,
                        "<uri>{}</uri>",
                        escape_xml(link.url.as_deref().unwrap_or(""))
                    );
                }
                out.push_str("</links>");
            }
            ODataPayload::Binary(_) => {
                return Err(ODataError::internal_server_error(
                    "Binary payloads are streamed directly, not serialized.",
                ))
            }
        }
        Ok(out)
    }

    fn write_service_document(&self, service: &ServiceDocument) -> odata_common::Result<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
        let _ = write!(
            &mut out,
            "<service xmlns=\"http://www.w3.org/2007/app\" xmlns:atom=\"{ATOM_NAMESPACE}\"><workspace><atom:title>{}</atom:title>",
            escape_xml(&service.title)
        );
        for collection in &service.collections {
            let name = escape_xml(collection);
            let _ = write!(
                &mut out,
                "<collection href=\"{name}\"><atom:title>{name}</atom:title></collection>"
            );
        }
        out.push_str("</workspace></service>");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_atom_and_plain_xml_at_any_version() {
        let writer = AtomWriter::new();
        for version in [Version::V1, Version::V2, Version::V3] {
            assert!(writer.can_handle(version, MIME_APPLICATION_ATOM));
            assert!(writer.can_handle(version, MIME_APPLICATION_XML));
            assert!(!writer.can_handle(version, "application/json"));
        }
    }

    #[test]
    fn escapes_markup_in_property_values() {
        let mut entry = ODataEntry::new();
        entry.properties.push(crate::payload::ODataProperty::new(
            "Name",
            None,
            serde_json::json!("a < b & c"),
        ));
        let body = AtomWriter::new().write(&ODataPayload::Entry(entry)).unwrap();
        assert!(body.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn service_document_lists_collections() {
        let service = ServiceDocument::new(
            "Default",
            vec!["Customers".to_string(), "Orders".to_string()],
        );
        let body = AtomWriter::new().write_service_document(&service).unwrap();
        assert!(body.contains("<collection href=\"Customers\">"));
        assert!(body.contains("<collection href=\"Orders\">"));
        assert!(body.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\""));
    }
}
