//! Resource properties.

use crate::error::{Error, Result};
use crate::kind::{
    is_resource_kind_valid_for_property_kind, ResourcePropertyKind, ResourceTypeKind,
};
use crate::resource_type::{InstanceType, ResourceType};
use std::sync::Arc;

/// A declared property of an entity or complex type.
///
/// All structural invariants are enforced at construction; a
/// `ResourceProperty` value is never partially valid.
#[derive(Debug, Clone)]
pub struct ResourceProperty {
    name: String,
    mime_type: Option<String>,
    kind: ResourcePropertyKind,
    resource_type: Arc<ResourceType>,
}

impl ResourceProperty {
    /// Build a property, failing fast on any structural violation:
    /// an empty or underscore-prefixed name, a kind outside the legality
    /// table, or a kind incompatible with the resource type's kind.
    pub fn new(
        name: &str,
        mime_type: Option<&str>,
        kind: ResourcePropertyKind,
        resource_type: Arc<ResourceType>,
    ) -> Result<ResourceProperty> {
        if !is_valid_property_name(name) {
            return Err(Error::InvalidPropertyName(name.to_string()));
        }
        if !kind.is_valid() {
            return Err(Error::InvalidPropertyKind(name.to_string()));
        }
        if !is_resource_kind_valid_for_property_kind(kind, resource_type.kind()) {
            return Err(Error::PropertyKindMismatch {
                name: name.to_string(),
                type_name: resource_type.full_name(),
            });
        }
        Ok(ResourceProperty {
            name: name.to_string(),
            mime_type: mime_type.map(str::to_string),
            kind,
            resource_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn kind(&self) -> ResourcePropertyKind {
        self.kind
    }

    /// Whether this property's kind contains `kind` (bitwise containment).
    pub fn is_kind_of(&self, kind: ResourcePropertyKind) -> bool {
        self.kind.is_kind_of(kind)
    }

    /// The resource type this property is declared with.
    pub fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    /// The kind of the declared resource type.
    pub fn type_kind(&self) -> ResourceTypeKind {
        self.resource_type.kind()
    }

    /// The underlying instance descriptor: the EDM type for primitive-kind
    /// properties, the structural type name for complex and reference
    /// kinds. The construction invariants guarantee the variant matches
    /// the property kind.
    pub fn instance_type(&self) -> InstanceType {
        let instance = self.resource_type.instance_type();
        debug_assert_eq!(
            matches!(instance, InstanceType::Primitive(_)),
            self.is_kind_of(ResourcePropertyKind::PRIMITIVE)
        );
        instance
    }
}

fn is_valid_property_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::EdmType;

    fn string_type() -> Arc<ResourceType> {
        ResourceType::primitive(EdmType::String)
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = ResourceProperty::new("", None, ResourcePropertyKind::PRIMITIVE, string_type())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyName(_)));
    }

    #[test]
    fn underscore_prefixed_name_is_rejected() {
        let err =
            ResourceProperty::new("_Name", None, ResourcePropertyKind::PRIMITIVE, string_type())
                .unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyName(_)));
    }

    #[test]
    fn invalid_kind_is_rejected() {
        let bare_flag = ResourcePropertyKind::BAG;
        let err = ResourceProperty::new("Tags", None, bare_flag, string_type()).unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyKind(_)));
    }

    #[test]
    fn kind_must_match_resource_type_kind() {
        // A complex-kind property declared with a primitive resource type.
        let err = ResourceProperty::new(
            "Address",
            None,
            ResourcePropertyKind::COMPLEX_TYPE,
            string_type(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::PropertyKindMismatch { .. }));

        // A reference-kind property needs an entity type.
        let complex = ResourceType::complex("NorthWind", "Address", "Address");
        let err = ResourceProperty::new(
            "Owner",
            None,
            ResourcePropertyKind::RESOURCE_REFERENCE,
            complex,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PropertyKindMismatch { .. }));
    }

    #[test]
    fn primitive_property_exposes_edm_instance_type() {
        let prop = ResourceProperty::new(
            "Name",
            None,
            ResourcePropertyKind::PRIMITIVE,
            string_type(),
        )
        .unwrap();
        assert!(matches!(
            prop.instance_type(),
            InstanceType::Primitive(EdmType::String)
        ));
        assert_eq!(prop.type_kind(), ResourceTypeKind::Primitive);
    }

    #[test]
    fn navigation_property_exposes_structural_instance_type() {
        let person = ResourceType::entity("NorthWind", "Person", "Person");
        let prop = ResourceProperty::new(
            "Owner",
            None,
            ResourcePropertyKind::RESOURCE_REFERENCE,
            person,
        )
        .unwrap();
        match prop.instance_type() {
            InstanceType::Structural(name) => assert_eq!(&*name, "Person"),
            InstanceType::Primitive(_) => panic!("navigation property must be structural"),
        }
    }

    #[test]
    fn mime_type_is_carried_through() {
        let prop = ResourceProperty::new(
            "Photo",
            Some("image/png"),
            ResourcePropertyKind::PRIMITIVE,
            ResourceType::primitive(EdmType::Binary),
        )
        .unwrap();
        assert_eq!(prop.mime_type(), Some("image/png"));
    }
}
