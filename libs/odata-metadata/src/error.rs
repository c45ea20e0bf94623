//! Error types for metadata construction.
//!
//! These are raised while the metadata graph is being built at service
//! startup. They are configuration errors, fatal to bringing the service
//! up - never deferred to request time.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Property name '{0}' violates the OData naming rules")]
    InvalidPropertyName(String),

    #[error("The kind given for property '{0}' is not a valid resource property kind")]
    InvalidPropertyKind(String),

    #[error(
        "The kind of property '{name}' does not match the kind of its resource type '{type_name}'"
    )]
    PropertyKindMismatch { name: String, type_name: String },

    #[error("Type '{type_name}' already declares a property named '{name}'")]
    DuplicateProperty { type_name: String, name: String },

    #[error("Key property '{name}' can only be declared on an entity type, not on '{type_name}'")]
    KeyOnNonEntityType { type_name: String, name: String },

    #[error("ETag property '{name}' can only be declared on an entity type, not on '{type_name}'")]
    ETagOnNonEntityType { type_name: String, name: String },

    #[error("Primitive type '{0}' cannot declare properties")]
    PropertyOnPrimitiveType(String),

    #[error("A resource set named '{0}' is already registered")]
    DuplicateResourceSet(String),

    #[error("A resource type named '{0}' is already registered")]
    DuplicateResourceType(String),

    #[error("Resource set '{0}' must be backed by an entity type")]
    ResourceSetRequiresEntityType(String),

    #[error("Page size must be non-negative, got '{0}'")]
    InvalidPageSize(i64),
}
