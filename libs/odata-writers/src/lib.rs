//! Response serialization for the OData engine.
//!
//! Materialized results flow through three stages:
//!
//! ```text
//! RequestDescription + Accept/$format
//!      |
//!   Negotiation -> concrete content type
//!      |
//!   Registry -> first registered writer that can_handle(version, type)
//!      |
//!   Dispatch -> OutgoingResponse (headers + body)
//! ```
//!
//! The registry is populated once at startup and read-only afterwards;
//! registration order is the priority order. [`default_registry`] wires
//! the standard Atom and JSON writer families in the order that keeps the
//! JSON-Light levels ahead of the verbose fallbacks.

pub mod atom;
pub mod dispatch;
pub mod json;
pub mod negotiation;
pub mod payload;
pub mod request;
pub mod writer;

pub use atom::AtomWriter;
pub use dispatch::{write_response, DispatchContext, ResponseSources};
pub use json::{JsonLightMetadataLevel, JsonLightWriter, JsonV1Writer, JsonV2Writer};
pub use negotiation::negotiate_content_type;
pub use payload::{
    ODataEntry, ODataFeed, ODataLink, ODataPayload, ODataProperty, ServiceDocument,
};
pub use request::{OutgoingResponse, RequestDescription, SegmentDescriptor, TargetKind};
pub use writer::{ODataWriter, ODataWriterRegistry};

/// The standard writer lineup: Atom first, then the JSON-Light levels,
/// then the verbose V1/V2 fallbacks.
pub fn default_registry(service_uri: &str) -> ODataWriterRegistry {
    let mut registry = ODataWriterRegistry::new();
    registry.register(Box::new(AtomWriter::new()));
    registry.register(Box::new(JsonLightWriter::new(
        JsonLightMetadataLevel::None,
        service_uri,
    )));
    registry.register(Box::new(JsonLightWriter::new(
        JsonLightMetadataLevel::Minimal,
        service_uri,
    )));
    registry.register(Box::new(JsonLightWriter::new(
        JsonLightMetadataLevel::Full,
        service_uri,
    )));
    registry.register(Box::new(JsonV1Writer::new()));
    registry.register(Box::new(JsonV2Writer::new()));
    registry
}
