//! Shared OData protocol vocabulary.
//!
//! Everything above the metadata layer reports failure through
//! [`ODataError`] - the closed taxonomy of protocol errors, each pinned to
//! an HTTP status code. This crate also carries the protocol [`Version`]
//! and the MIME-type constants the writer layer negotiates over.

pub mod error;
pub mod mime;
pub mod version;

pub use error::{ODataError, Result};
pub use version::Version;
