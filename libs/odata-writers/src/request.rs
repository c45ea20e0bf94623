//! The transport-facing request and response descriptors.
//!
//! The transport layer tokenizes the URI and builds a
//! [`RequestDescription`]; the dispatcher consumes it together with the
//! materialized payload and fills in an [`OutgoingResponse`]. Both are
//! plain data carried by value through the pipeline.

use odata_common::Version;

/// What the final path segment addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// `$metadata` document.
    Metadata,
    /// The service root.
    ServiceDirectory,
    /// An entity set, single entity, or `$links` projection.
    Resource,
    /// A complex-typed property value.
    ComplexObject,
    /// A primitive property (serialized by a writer).
    Primitive,
    /// A primitive `$value` (raw bytes, writer bypassed).
    PrimitiveValue,
    /// A media resource stream (raw bytes, writer bypassed).
    MediaResource,
    /// An association link.
    Link,
    /// A bag property.
    Bag,
}

impl TargetKind {
    /// Targets whose bytes are streamed straight through without writer
    /// negotiation.
    pub fn bypasses_writers(self) -> bool {
        matches!(self, TargetKind::PrimitiveValue | TargetKind::MediaResource)
    }
}

/// One path segment as produced by the URI processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    identifier: String,
    target_kind: TargetKind,
}

impl SegmentDescriptor {
    pub fn new(identifier: &str, target_kind: TargetKind) -> Self {
        SegmentDescriptor {
            identifier: identifier.to_string(),
            target_kind,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target_kind
    }
}

/// Everything the dispatcher needs to know about the pending request.
#[derive(Debug, Clone)]
pub struct RequestDescription {
    segments: Vec<SegmentDescriptor>,
    response_version: Version,
}

impl RequestDescription {
    pub fn new(segments: Vec<SegmentDescriptor>, response_version: Version) -> Self {
        RequestDescription {
            segments,
            response_version,
        }
    }

    pub fn segments(&self) -> &[SegmentDescriptor] {
        &self.segments
    }

    /// The protocol version the response will be stamped with.
    pub fn response_version(&self) -> Version {
        self.response_version
    }

    /// The kind of the last segment; an empty path addresses the service
    /// root.
    pub fn target_kind(&self) -> TargetKind {
        self.segments
            .last()
            .map(SegmentDescriptor::target_kind)
            .unwrap_or(TargetKind::ServiceDirectory)
    }

    /// Whether the addressed resource is reached through a `$links`
    /// segment, i.e. the segment before the last is `$links`.
    pub fn is_link_uri(&self) -> bool {
        self.segments.len() >= 2
            && self.segments[self.segments.len() - 2].identifier() == "$links"
    }
}

/// The response as handed back to the transport layer.
#[derive(Debug, Clone, Default)]
pub struct OutgoingResponse {
    status_code: Option<u16>,
    content_type: Option<String>,
    version: Option<String>,
    cache_control: Option<String>,
    etag: Option<String>,
    body: Vec<u8>,
}

impl OutgoingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_string());
    }

    pub fn set_version(&mut self, version: &str) {
        self.version = Some(version.to_string());
    }

    pub fn set_cache_control(&mut self, cache_control: &str) {
        self.cache_control = Some(cache_control.to_string());
    }

    pub fn set_etag(&mut self, etag: &str) {
        self.etag = Some(etag.to_string());
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
