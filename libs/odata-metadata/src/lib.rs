//! Resource metadata model for the OData engine.
//!
//! The typed description of entities, properties and their structural
//! kinds, against which requests and filter expressions are validated:
//!
//! - [`edm`]: EDM primitive type registry with stable type codes and the
//!   numeric promotion lattice.
//! - [`kind`]: `ResourceTypeKind` and the `ResourcePropertyKind` flag
//!   algebra with its legality table.
//! - [`resource_type`] / [`property`]: the metadata graph itself.
//! - [`provider`]: the read-accessor trait the rest of the engine depends
//!   on, plus an in-memory implementation.
//! - [`configuration`]: startup-time service knobs.
//!
//! All construction failures here are startup-fatal configuration errors,
//! deliberately distinct from the per-request protocol error taxonomy.

pub mod configuration;
pub mod edm;
pub mod error;
pub mod kind;
pub mod property;
pub mod provider;
pub mod resource_type;

pub use configuration::ServiceConfiguration;
pub use edm::EdmType;
pub use error::{Error, Result};
pub use kind::{
    is_resource_kind_valid_for_property_kind, ResourcePropertyKind, ResourceTypeKind,
};
pub use property::ResourceProperty;
pub use provider::{MetadataProvider, SimpleMetadataProvider};
pub use resource_type::{InstanceType, ResourceSet, ResourceType};
