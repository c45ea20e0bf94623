//! Metadata provider interface and the in-memory implementation.
//!
//! The engine depends only on the read accessors of [`MetadataProvider`];
//! how a concrete provider discovers its types is outside the core.
//! [`SimpleMetadataProvider`] builds the graph programmatically and is
//! what services without a discovery layer register at startup.

use crate::edm::EdmType;
use crate::error::{Error, Result};
use crate::kind::ResourcePropertyKind;
use crate::property::ResourceProperty;
use crate::resource_type::{ResourceSet, ResourceType};
use std::collections::HashMap;
use std::sync::Arc;

/// Read accessors over a service's metadata graph.
///
/// Implementations are built once at startup and are read-only for the
/// lifetime of the process; concurrent requests share them freely.
pub trait MetadataProvider: Send + Sync {
    /// The entity-container name, e.g. `NorthWindEntities`.
    fn container_name(&self) -> &str;

    /// The container namespace, e.g. `NorthWind`.
    fn container_namespace(&self) -> &str;

    /// All resource sets exposed by the service.
    fn resource_sets(&self) -> Vec<Arc<ResourceSet>>;

    /// All resource types known to the service.
    fn types(&self) -> Vec<Arc<ResourceType>>;

    /// Look up a resource set by name.
    fn resolve_resource_set(&self, name: &str) -> Option<Arc<ResourceSet>>;

    /// Look up a resource type by its unqualified name.
    fn resolve_resource_type(&self, name: &str) -> Option<Arc<ResourceType>>;
}

/// In-memory metadata provider populated through builder methods.
#[derive(Default)]
pub struct SimpleMetadataProvider {
    container_name: String,
    container_namespace: String,
    sets: HashMap<String, Arc<ResourceSet>>,
    types: HashMap<String, Arc<ResourceType>>,
    // Registration order, for stable enumeration in the metadata document.
    set_order: Vec<String>,
    type_order: Vec<String>,
}

impl SimpleMetadataProvider {
    pub fn new(container_name: &str, container_namespace: &str) -> Self {
        SimpleMetadataProvider {
            container_name: container_name.to_string(),
            container_namespace: container_namespace.to_string(),
            ..Default::default()
        }
    }

    /// Register an entity type under its unqualified name.
    pub fn add_entity_type(&mut self, name: &str) -> Result<Arc<ResourceType>> {
        let ty = ResourceType::entity(&self.container_namespace, name, name);
        self.register_type(ty)
    }

    /// Register a complex type under its unqualified name.
    pub fn add_complex_type(&mut self, name: &str) -> Result<Arc<ResourceType>> {
        let ty = ResourceType::complex(&self.container_namespace, name, name);
        self.register_type(ty)
    }

    fn register_type(&mut self, ty: Arc<ResourceType>) -> Result<Arc<ResourceType>> {
        let name = ty.name().to_string();
        if self.types.contains_key(&name) {
            return Err(Error::DuplicateResourceType(name));
        }
        tracing::debug!(type_name = %ty.full_name(), "registered resource type");
        self.type_order.push(name.clone());
        self.types.insert(name, Arc::clone(&ty));
        Ok(ty)
    }

    /// Expose an entity type through a named resource set.
    pub fn add_resource_set(
        &mut self,
        name: &str,
        resource_type: Arc<ResourceType>,
    ) -> Result<Arc<ResourceSet>> {
        if self.sets.contains_key(name) {
            return Err(Error::DuplicateResourceSet(name.to_string()));
        }
        let set = Arc::new(ResourceSet::new(name, resource_type)?);
        self.set_order.push(name.to_string());
        self.sets.insert(name.to_string(), Arc::clone(&set));
        Ok(set)
    }

    /// Declare a primitive key property.
    pub fn add_key_property(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        edm: EdmType,
    ) -> Result<()> {
        self.add_primitive_internal(ty, name, edm, ResourcePropertyKind::PRIMITIVE.with_key())
    }

    /// Declare a plain primitive property.
    pub fn add_primitive_property(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        edm: EdmType,
    ) -> Result<()> {
        self.add_primitive_internal(ty, name, edm, ResourcePropertyKind::PRIMITIVE)
    }

    /// Declare a primitive property participating in the entity's ETag.
    pub fn add_etag_property(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        edm: EdmType,
    ) -> Result<()> {
        self.add_primitive_internal(ty, name, edm, ResourcePropertyKind::PRIMITIVE.with_etag())
    }

    fn add_primitive_internal(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        edm: EdmType,
        kind: ResourcePropertyKind,
    ) -> Result<()> {
        let prop = ResourceProperty::new(name, None, kind, ResourceType::primitive(edm))?;
        ty.add_property(prop)
    }

    /// Declare a complex-typed property.
    pub fn add_complex_property(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        complex_type: Arc<ResourceType>,
    ) -> Result<()> {
        let prop =
            ResourceProperty::new(name, None, ResourcePropertyKind::COMPLEX_TYPE, complex_type)?;
        ty.add_property(prop)
    }

    /// Declare a navigation property referencing a single entity.
    pub fn add_resource_reference_property(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        target: Arc<ResourceType>,
    ) -> Result<()> {
        let prop = ResourceProperty::new(
            name,
            None,
            ResourcePropertyKind::RESOURCE_REFERENCE,
            target,
        )?;
        ty.add_property(prop)
    }

    /// Declare a navigation property referencing an entity set.
    pub fn add_resource_set_reference_property(
        &mut self,
        ty: &Arc<ResourceType>,
        name: &str,
        target: Arc<ResourceType>,
    ) -> Result<()> {
        let prop = ResourceProperty::new(
            name,
            None,
            ResourcePropertyKind::RESOURCESET_REFERENCE,
            target,
        )?;
        ty.add_property(prop)
    }
}

impl MetadataProvider for SimpleMetadataProvider {
    fn container_name(&self) -> &str {
        &self.container_name
    }

    fn container_namespace(&self) -> &str {
        &self.container_namespace
    }

    fn resource_sets(&self) -> Vec<Arc<ResourceSet>> {
        self.set_order
            .iter()
            .filter_map(|name| self.sets.get(name).cloned())
            .collect()
    }

    fn types(&self) -> Vec<Arc<ResourceType>> {
        self.type_order
            .iter()
            .filter_map(|name| self.types.get(name).cloned())
            .collect()
    }

    fn resolve_resource_set(&self, name: &str) -> Option<Arc<ResourceSet>> {
        self.sets.get(name).cloned()
    }

    fn resolve_resource_type(&self, name: &str) -> Option<Arc<ResourceType>> {
        self.types.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_wind() -> SimpleMetadataProvider {
        let mut provider = SimpleMetadataProvider::new("NorthWindEntities", "NorthWind");
        let customer = provider.add_entity_type("Customer").unwrap();
        provider
            .add_key_property(&customer, "CustomerID", EdmType::String)
            .unwrap();
        provider
            .add_primitive_property(&customer, "Age", EdmType::Int32)
            .unwrap();
        let order = provider.add_entity_type("Order").unwrap();
        provider
            .add_key_property(&order, "OrderID", EdmType::Int32)
            .unwrap();
        provider
            .add_resource_reference_property(&order, "Customer", customer.clone())
            .unwrap();
        provider
            .add_resource_set_reference_property(&customer, "Orders", order)
            .unwrap();
        provider.add_resource_set("Customers", customer).unwrap();
        provider
    }

    #[test]
    fn resolves_registered_sets_and_types() {
        let provider = north_wind();
        assert!(provider.resolve_resource_set("Customers").is_some());
        assert!(provider.resolve_resource_set("Suppliers").is_none());
        assert!(provider.resolve_resource_type("Customer").is_some());
        assert_eq!(provider.types().len(), 2);
        assert_eq!(provider.resource_sets().len(), 1);
    }

    #[test]
    fn mutual_navigation_references_can_be_wired() {
        let provider = north_wind();
        let customer = provider.resolve_resource_type("Customer").unwrap();
        let order = provider.resolve_resource_type("Order").unwrap();
        assert!(customer.resolve_property("Orders").is_some());
        assert!(order.resolve_property("Customer").is_some());
    }

    #[test]
    fn duplicate_registrations_fail() {
        let mut provider = north_wind();
        assert!(matches!(
            provider.add_entity_type("Customer"),
            Err(Error::DuplicateResourceType(_))
        ));
        let order = provider.resolve_resource_type("Order").unwrap();
        assert!(matches!(
            provider.add_resource_set("Customers", order),
            Err(Error::DuplicateResourceSet(_))
        ));
    }
}
