//! Response dispatch.
//!
//! [`write_response`] is the terminal stage of the pipeline: given the
//! request description, the materialized payload, and the negotiated
//! content type, it routes by target kind, resolves a writer where one is
//! required, and fills in the outgoing response (status, content type,
//! protocol version header, cache control, body).
//!
//! Metadata documents and raw-byte targets bypass the registry; the
//! `$links` payload rule is checked before any writer is consulted.

use crate::payload::{ODataPayload, ServiceDocument};
use crate::request::{OutgoingResponse, RequestDescription, TargetKind};
use crate::writer::ODataWriterRegistry;
use odata_common::mime::MIME_APPLICATION_XML;
use odata_common::{ODataError, Version};

pub const NO_WRITER_MESSAGE: &str = "No writer can handle the request.";
pub const LINK_PAYLOAD_MESSAGE: &str =
    "A model payload cannot be specified for a request to a $links URI.";

/// External collaborators the dispatcher pulls bodies from for targets
/// the writer registry does not cover.
pub trait ResponseSources {
    /// The `$metadata` document, rendered by the metadata layer.
    fn metadata_document(&self) -> odata_common::Result<String>;

    /// A media resource's bytes.
    fn read_stream(&self) -> odata_common::Result<Vec<u8>>;

    /// The ETag of the media resource stream, if any.
    fn stream_etag(&self) -> Option<String>;
}

/// Everything the dispatcher needs beyond the request itself. Built once
/// at startup (registry, service document) plus the per-request sources.
pub struct DispatchContext<'a> {
    pub registry: &'a ODataWriterRegistry,
    pub service_document: &'a ServiceDocument,
    pub sources: &'a dyn ResponseSources,
}

fn finish(response: &mut OutgoingResponse, content_type: &str, body: Vec<u8>) {
    if response.status_code().is_none() {
        response.set_status_code(200);
    }
    response.set_content_type(content_type);
    // The version header always advertises the highest protocol version
    // the service speaks, independent of the response version.
    response.set_version(&Version::V3.to_header_value());
    response.set_cache_control("no-cache");
    response.set_body(body);
}

/// Serialize `payload` for `request` into `response`.
///
/// `content_type` is the negotiated response content type; `None` means
/// negotiation produced nothing, which for writer-backed targets is the
/// terminal "no writer" condition.
pub fn write_response(
    context: &DispatchContext<'_>,
    request: &RequestDescription,
    payload: &ODataPayload,
    content_type: Option<&str>,
    response: &mut OutgoingResponse,
) -> odata_common::Result<()> {
    let target_kind = request.target_kind();
    tracing::debug!(?target_kind, content_type, "dispatching response");

    match target_kind {
        TargetKind::Metadata => {
            let document = context.sources.metadata_document()?;
            finish(response, MIME_APPLICATION_XML, document.into_bytes());
            Ok(())
        }
        TargetKind::ServiceDirectory => {
            let content_type = content_type
                .ok_or_else(|| ODataError::internal_server_error(NO_WRITER_MESSAGE))?;
            let writer = context
                .registry
                .writer_for(request.response_version(), content_type)
                .ok_or_else(|| ODataError::internal_server_error(NO_WRITER_MESSAGE))?;
            let body = writer.write_service_document(context.service_document)?;
            finish(response, content_type, body.into_bytes());
            Ok(())
        }
        TargetKind::MediaResource => {
            if let Some(etag) = context.sources.stream_etag() {
                response.set_etag(&etag);
            }
            let bytes = context.sources.read_stream()?;
            finish(
                response,
                content_type.unwrap_or(odata_common::mime::MIME_APPLICATION_OCTETSTREAM),
                bytes,
            );
            Ok(())
        }
        TargetKind::PrimitiveValue => {
            let bytes = match payload {
                ODataPayload::Binary(bytes) => bytes.clone(),
                other => {
                    return Err(ODataError::internal_server_error(format!(
                        "A $value target requires a binary payload, got {other:?}."
                    )))
                }
            };
            finish(
                response,
                content_type.unwrap_or(odata_common::mime::MIME_TEXTPLAIN),
                bytes,
            );
            Ok(())
        }
        _ => {
            if request.is_link_uri() && payload.is_entity_model() {
                tracing::debug!("entity payload against a $links segment");
                return Err(ODataError::bad_request(LINK_PAYLOAD_MESSAGE));
            }
            let content_type = content_type
                .ok_or_else(|| ODataError::internal_server_error(NO_WRITER_MESSAGE))?;
            let writer = context
                .registry
                .writer_for(request.response_version(), content_type)
                .ok_or_else(|| ODataError::internal_server_error(NO_WRITER_MESSAGE))?;
            let body = writer.write(payload)?;
            finish(response, content_type, body.into_bytes());
            Ok(())
        }
    }
}
