//! MIME types the protocol negotiates over.
//!
//! Writer capabilities compare against these constants. Comparison helpers
//! normalize case and strip parameters so `application/json;odata=verbose`
//! can be examined as a media type plus parameter list.

pub const MIME_APPLICATION_ATOM: &str = "application/atom+xml";
pub const MIME_APPLICATION_ATOMSERVICE: &str = "application/atomsvc+xml";
pub const MIME_APPLICATION_XML: &str = "application/xml";
pub const MIME_APPLICATION_JSON: &str = "application/json";
pub const MIME_APPLICATION_JSON_VERBOSE: &str = "application/json;odata=verbose";
pub const MIME_APPLICATION_JSON_NO_META: &str = "application/json;odata=nometadata";
pub const MIME_APPLICATION_JSON_MINIMAL_META: &str = "application/json;odata=minimalmetadata";
pub const MIME_APPLICATION_JSON_FULL_META: &str = "application/json;odata=fullmetadata";
pub const MIME_APPLICATION_OCTETSTREAM: &str = "application/octet-stream";
pub const MIME_TEXTPLAIN: &str = "text/plain";
pub const MIME_CHARSET_UTF8: &str = "charset=utf-8";

/// The media type of a content-type value, lowercased, parameters stripped.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

/// Whether a content-type value carries the given `key=value` parameter.
pub fn has_parameter(content_type: &str, parameter: &str) -> bool {
    content_type
        .split(';')
        .skip(1)
        .any(|part| part.trim().eq_ignore_ascii_case(parameter))
}

/// Media-type equality, ignoring case and parameters on either side.
pub fn media_type_matches(content_type: &str, expected: &str) -> bool {
    media_type(content_type) == media_type(expected)
}
