//! The writer capability interface and the ordered registry.

use crate::payload::{ODataPayload, ServiceDocument};
use odata_common::Version;

/// A serializer for one wire format at one or more protocol versions.
///
/// `can_handle` is the negotiation predicate; a writer that answers true
/// must be able to render any payload for that version and content type.
pub trait ODataWriter: Send + Sync {
    /// Whether this writer can render a response for the given protocol
    /// version and full content-type string (parameters included).
    fn can_handle(&self, version: Version, content_type: &str) -> bool;

    /// Serialize a query result payload.
    fn write(&self, payload: &ODataPayload) -> odata_common::Result<String>;

    /// Serialize the service document.
    fn write_service_document(&self, service: &ServiceDocument) -> odata_common::Result<String>;
}

/// Ordered collection of writers. Selection is first-match in
/// registration order, so registration order encodes priority: a more
/// specific writer must be registered before a broader one that would
/// also match.
#[derive(Default)]
pub struct ODataWriterRegistry {
    writers: Vec<Box<dyn ODataWriter>>,
}

impl ODataWriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a writer. No de-duplication and no overlap validation;
    /// position is the only priority mechanism.
    pub fn register(&mut self, writer: Box<dyn ODataWriter>) {
        self.writers.push(writer);
    }

    /// Linear scan returning the first writer whose `can_handle` holds.
    pub fn writer_for(&self, version: Version, content_type: &str) -> Option<&dyn ODataWriter> {
        let found = self
            .writers
            .iter()
            .position(|writer| writer.can_handle(version, content_type));
        match found {
            Some(index) => {
                tracing::trace!(%version, content_type, index, "writer selected");
                Some(self.writers[index].as_ref())
            }
            None => {
                tracing::debug!(%version, content_type, "no writer matched");
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }
}
