//! Content negotiation.
//!
//! Priority for format selection:
//! 1. `$format` query option (highest)
//! 2. `Accept` header, scanned in listed order
//! 3. Default for the target kind and protocol version
//!
//! The outcome is a concrete content-type string the writer registry is
//! then asked to satisfy. Negotiation never inspects writers itself; a
//! negotiated type with no registered writer still fails at dispatch.

use crate::request::TargetKind;
use odata_common::mime::{
    self, MIME_APPLICATION_ATOM, MIME_APPLICATION_ATOMSERVICE, MIME_APPLICATION_JSON,
    MIME_APPLICATION_JSON_MINIMAL_META, MIME_APPLICATION_JSON_VERBOSE, MIME_APPLICATION_OCTETSTREAM,
    MIME_APPLICATION_XML, MIME_TEXTPLAIN,
};
use odata_common::{ODataError, Version};

/// Media types a structured-resource response can be served as.
const RESOURCE_MEDIA_TYPES: &[&str] = &[
    MIME_APPLICATION_ATOM,
    MIME_APPLICATION_XML,
    MIME_APPLICATION_JSON,
];

fn format_option_to_content_type(format: &str, version: Version) -> Option<&'static str> {
    match format.trim().to_ascii_lowercase().as_str() {
        "atom" => Some(MIME_APPLICATION_ATOM),
        "xml" => Some(MIME_APPLICATION_XML),
        "verbosejson" => Some(MIME_APPLICATION_JSON_VERBOSE),
        // In V3 `json` means JSON light; earlier versions get verbose JSON.
        "json" if version >= Version::V3 => Some(MIME_APPLICATION_JSON_MINIMAL_META),
        "json" => Some(MIME_APPLICATION_JSON),
        _ => None,
    }
}

fn default_content_type(target_kind: TargetKind) -> &'static str {
    match target_kind {
        TargetKind::Metadata => MIME_APPLICATION_XML,
        TargetKind::ServiceDirectory => MIME_APPLICATION_ATOMSERVICE,
        TargetKind::PrimitiveValue => MIME_TEXTPLAIN,
        TargetKind::MediaResource => MIME_APPLICATION_OCTETSTREAM,
        _ => MIME_APPLICATION_ATOM,
    }
}

/// Whether an Accept entry (possibly a wildcard) admits the given media
/// type.
fn accept_entry_admits(entry: &str, media: &str) -> bool {
    let entry = mime::media_type(entry);
    if entry == "*/*" {
        return true;
    }
    if let Some(prefix) = entry.strip_suffix("/*") {
        return media.starts_with(prefix) && media.as_bytes().get(prefix.len()) == Some(&b'/');
    }
    entry == media
}

fn content_type_from_accept(accept: &str, target_kind: TargetKind) -> Option<String> {
    let candidates: &[&str] = match target_kind {
        TargetKind::Metadata => &[MIME_APPLICATION_XML],
        TargetKind::ServiceDirectory => &[
            MIME_APPLICATION_ATOMSERVICE,
            MIME_APPLICATION_XML,
            MIME_APPLICATION_JSON,
        ],
        TargetKind::PrimitiveValue => &[MIME_TEXTPLAIN, MIME_APPLICATION_OCTETSTREAM],
        TargetKind::MediaResource => &[MIME_APPLICATION_OCTETSTREAM],
        _ => RESOURCE_MEDIA_TYPES,
    };

    for entry in accept.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        // A wildcard falls through to the target kind's default.
        if mime::media_type(entry) == "*/*" {
            return Some(default_content_type(target_kind).to_string());
        }
        for candidate in candidates {
            if accept_entry_admits(entry, candidate) {
                // Keep the client's parameters (e.g. odata=verbose) so the
                // registry can see them.
                return Some(entry.to_string());
            }
        }
    }
    None
}

/// Resolve the response content type for a request.
///
/// An unknown `$format` value is a 400; an `Accept` header that admits
/// none of the servable media types for the target is a 406.
pub fn negotiate_content_type(
    format_option: Option<&str>,
    accept_header: Option<&str>,
    version: Version,
    target_kind: TargetKind,
) -> odata_common::Result<String> {
    if let Some(format) = format_option {
        let content_type = format_option_to_content_type(format, version).ok_or_else(|| {
            ODataError::bad_request(format!(
                "The value '{format}' of the $format query option is not valid."
            ))
        })?;
        tracing::trace!(format, content_type, "content type from $format");
        return Ok(content_type.to_string());
    }

    if let Some(accept) = accept_header {
        if !accept.trim().is_empty() {
            return content_type_from_accept(accept, target_kind).ok_or_else(|| {
                ODataError::not_acceptable(format!(
                    "Cannot serve the requested media types '{accept}'."
                ))
            });
        }
    }

    Ok(default_content_type(target_kind).to_string())
}
