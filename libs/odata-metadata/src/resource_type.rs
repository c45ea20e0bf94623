//! Resource types and resource sets.
//!
//! A `ResourceType` describes an entity, complex type, or primitive
//! wrapper. Its identity (name, namespace, kind, instance type) is fixed
//! at construction; the property list is populated during the startup
//! build of the metadata graph and read-only afterwards. The interior
//! lock exists only so mutually referencing entity types can be wired up
//! after both `Arc`s exist.

use crate::edm::EdmType;
use crate::error::{Error, Result};
use crate::kind::{ResourcePropertyKind, ResourceTypeKind};
use crate::property::ResourceProperty;
use std::sync::{Arc, RwLock};

/// The underlying instance descriptor of a resource type: an EDM
/// primitive for primitive types, a structural type name otherwise.
///
/// Callers switch on the variant; which one they get is fully determined
/// by the resource type's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceType {
    Primitive(EdmType),
    Structural(Arc<str>),
}

/// Structural description of an entity, complex type, or primitive.
#[derive(Debug)]
pub struct ResourceType {
    name: String,
    namespace: String,
    kind: ResourceTypeKind,
    instance: InstanceType,
    base: Option<Arc<ResourceType>>,
    properties: RwLock<Vec<Arc<ResourceProperty>>>,
}

impl ResourceType {
    /// Primitive wrapper around an EDM type, e.g. `Edm.Int32`.
    pub fn primitive(edm: EdmType) -> Arc<ResourceType> {
        Arc::new(ResourceType {
            name: edm.name().to_string(),
            namespace: "Edm".to_string(),
            kind: ResourceTypeKind::Primitive,
            instance: InstanceType::Primitive(edm),
            base: None,
            properties: RwLock::new(Vec::new()),
        })
    }

    /// A complex type backed by the named structural type.
    pub fn complex(namespace: &str, name: &str, instance_name: &str) -> Arc<ResourceType> {
        Self::structural(namespace, name, instance_name, ResourceTypeKind::Complex, None)
    }

    /// An entity type backed by the named structural type.
    pub fn entity(namespace: &str, name: &str, instance_name: &str) -> Arc<ResourceType> {
        Self::structural(namespace, name, instance_name, ResourceTypeKind::Entity, None)
    }

    /// An entity type deriving from `base`.
    pub fn derived_entity(
        namespace: &str,
        name: &str,
        instance_name: &str,
        base: Arc<ResourceType>,
    ) -> Arc<ResourceType> {
        Self::structural(
            namespace,
            name,
            instance_name,
            ResourceTypeKind::Entity,
            Some(base),
        )
    }

    fn structural(
        namespace: &str,
        name: &str,
        instance_name: &str,
        kind: ResourceTypeKind,
        base: Option<Arc<ResourceType>>,
    ) -> Arc<ResourceType> {
        Arc::new(ResourceType {
            name: name.to_string(),
            namespace: namespace.to_string(),
            kind,
            instance: InstanceType::Structural(Arc::from(instance_name)),
            base,
            properties: RwLock::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespace-qualified name, e.g. `NorthWind.Customer`.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn kind(&self) -> ResourceTypeKind {
        self.kind
    }

    pub fn base_type(&self) -> Option<&Arc<ResourceType>> {
        self.base.as_ref()
    }

    /// The underlying instance descriptor, tagged by kind.
    pub fn instance_type(&self) -> InstanceType {
        self.instance.clone()
    }

    /// The EDM type when this is a primitive wrapper.
    pub fn edm_type(&self) -> Option<EdmType> {
        match self.instance {
            InstanceType::Primitive(edm) => Some(edm),
            InstanceType::Structural(_) => None,
        }
    }

    /// Declare a property on this type. Only legal during the startup
    /// build; the graph is treated as frozen once the provider is served.
    pub fn add_property(&self, property: ResourceProperty) -> Result<()> {
        if self.kind == ResourceTypeKind::Primitive {
            return Err(Error::PropertyOnPrimitiveType(self.full_name()));
        }
        if property.is_kind_of(ResourcePropertyKind::KEY) && self.kind != ResourceTypeKind::Entity
        {
            return Err(Error::KeyOnNonEntityType {
                type_name: self.full_name(),
                name: property.name().to_string(),
            });
        }
        if property.is_kind_of(ResourcePropertyKind::ETAG) && self.kind != ResourceTypeKind::Entity
        {
            return Err(Error::ETagOnNonEntityType {
                type_name: self.full_name(),
                name: property.name().to_string(),
            });
        }
        if self.resolve_property(property.name()).is_some() {
            return Err(Error::DuplicateProperty {
                type_name: self.full_name(),
                name: property.name().to_string(),
            });
        }
        let mut properties = self
            .properties
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        properties.push(Arc::new(property));
        Ok(())
    }

    /// All declared properties, base-type properties first.
    pub fn properties(&self) -> Vec<Arc<ResourceProperty>> {
        let mut all = match &self.base {
            Some(base) => base.properties(),
            None => Vec::new(),
        };
        let own = self
            .properties
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        all.extend(own.iter().cloned());
        all
    }

    /// Look a property up by name, searching base types too.
    pub fn resolve_property(&self, name: &str) -> Option<Arc<ResourceProperty>> {
        {
            let own = self
                .properties
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(found) = own.iter().find(|p| p.name() == name) {
                return Some(Arc::clone(found));
            }
        }
        self.base.as_ref().and_then(|base| base.resolve_property(name))
    }

    /// The properties forming this entity type's key.
    pub fn key_properties(&self) -> Vec<Arc<ResourceProperty>> {
        self.properties()
            .into_iter()
            .filter(|p| p.is_kind_of(ResourcePropertyKind::KEY))
            .collect()
    }

    /// The properties participating in the entity's ETag.
    pub fn etag_properties(&self) -> Vec<Arc<ResourceProperty>> {
        self.properties()
            .into_iter()
            .filter(|p| p.is_kind_of(ResourcePropertyKind::ETAG))
            .collect()
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.namespace == other.namespace
    }
}

impl Eq for ResourceType {}

/// A named, queryable collection of entities of one resource type.
#[derive(Debug, Clone)]
pub struct ResourceSet {
    name: String,
    resource_type: Arc<ResourceType>,
}

impl ResourceSet {
    pub fn new(name: &str, resource_type: Arc<ResourceType>) -> Result<ResourceSet> {
        if resource_type.kind() != ResourceTypeKind::Entity {
            return Err(Error::ResourceSetRequiresEntityType(name.to_string()));
        }
        Ok(ResourceSet {
            name: name.to_string(),
            resource_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_type() -> Arc<ResourceType> {
        let ty = ResourceType::entity("NorthWind", "Customer", "Customer");
        let id = ResourceProperty::new(
            "CustomerID",
            None,
            ResourcePropertyKind::PRIMITIVE.with_key(),
            ResourceType::primitive(EdmType::String),
        )
        .unwrap();
        ty.add_property(id).unwrap();
        ty
    }

    #[test]
    fn primitive_wrapper_exposes_edm_type() {
        let ty = ResourceType::primitive(EdmType::Int32);
        assert_eq!(ty.kind(), ResourceTypeKind::Primitive);
        assert_eq!(ty.full_name(), "Edm.Int32");
        assert_eq!(ty.edm_type(), Some(EdmType::Int32));
        assert!(matches!(
            ty.instance_type(),
            InstanceType::Primitive(EdmType::Int32)
        ));
    }

    #[test]
    fn primitive_types_reject_properties() {
        let ty = ResourceType::primitive(EdmType::String);
        let prop = ResourceProperty::new(
            "Length",
            None,
            ResourcePropertyKind::PRIMITIVE,
            ResourceType::primitive(EdmType::Int32),
        )
        .unwrap();
        assert!(matches!(
            ty.add_property(prop),
            Err(Error::PropertyOnPrimitiveType(_))
        ));
    }

    #[test]
    fn duplicate_property_names_are_rejected() {
        let ty = customer_type();
        let dup = ResourceProperty::new(
            "CustomerID",
            None,
            ResourcePropertyKind::PRIMITIVE,
            ResourceType::primitive(EdmType::String),
        )
        .unwrap();
        assert!(matches!(
            ty.add_property(dup),
            Err(Error::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn key_properties_only_on_entities() {
        let complex = ResourceType::complex("NorthWind", "Address", "Address");
        let key = ResourceProperty::new(
            "Zip",
            None,
            ResourcePropertyKind::PRIMITIVE.with_key(),
            ResourceType::primitive(EdmType::String),
        )
        .unwrap();
        assert!(matches!(
            complex.add_property(key),
            Err(Error::KeyOnNonEntityType { .. })
        ));
    }

    #[test]
    fn derived_types_inherit_properties() {
        let base = customer_type();
        let derived =
            ResourceType::derived_entity("NorthWind", "PreferredCustomer", "PreferredCustomer", base);
        let discount = ResourceProperty::new(
            "Discount",
            None,
            ResourcePropertyKind::PRIMITIVE,
            ResourceType::primitive(EdmType::Double),
        )
        .unwrap();
        derived.add_property(discount).unwrap();

        assert!(derived.resolve_property("CustomerID").is_some());
        assert_eq!(derived.properties().len(), 2);
        assert_eq!(derived.key_properties().len(), 1);
    }

    #[test]
    fn resource_set_requires_entity_type() {
        let complex = ResourceType::complex("NorthWind", "Address", "Address");
        assert!(matches!(
            ResourceSet::new("Addresses", complex),
            Err(Error::ResourceSetRequiresEntityType(_))
        ));
        assert!(ResourceSet::new("Customers", customer_type()).is_ok());
    }
}
