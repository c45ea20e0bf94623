//! Service-level configuration.
//!
//! Captures the knobs a service fixes at startup: per-entity-set page
//! sizes, verbose error payloads, and ETag header validation. Like the
//! metadata graph, a configuration is built once and read-only afterwards.

use crate::error::{Error, Result};
use crate::resource_type::ResourceSet;
use std::collections::HashMap;

/// Page size sentinel meaning "no server-driven paging".
pub const PAGE_SIZE_UNLIMITED: u64 = 0;

#[derive(Debug, Default)]
pub struct ServiceConfiguration {
    page_sizes: HashMap<String, u64>,
    default_page_size: u64,
    use_verbose_errors: bool,
    validate_etag_header: bool,
}

impl ServiceConfiguration {
    pub fn new() -> Self {
        Self {
            validate_etag_header: true,
            ..Default::default()
        }
    }

    /// Set the page size for one entity set. A size at or beyond
    /// `i64::MAX` normalizes to [`PAGE_SIZE_UNLIMITED`]; negative sizes
    /// are a configuration error.
    pub fn set_entity_set_page_size(&mut self, set_name: &str, size: i64) -> Result<()> {
        if size < 0 {
            return Err(Error::InvalidPageSize(size));
        }
        let stored = if size == i64::MAX {
            PAGE_SIZE_UNLIMITED
        } else {
            size as u64
        };
        self.page_sizes.insert(set_name.to_string(), stored);
        Ok(())
    }

    /// Fallback page size for entity sets without an explicit entry.
    pub fn set_default_page_size(&mut self, size: i64) -> Result<()> {
        if size < 0 {
            return Err(Error::InvalidPageSize(size));
        }
        self.default_page_size = if size == i64::MAX {
            PAGE_SIZE_UNLIMITED
        } else {
            size as u64
        };
        Ok(())
    }

    /// Effective page size for a resource set; 0 means unlimited.
    pub fn entity_set_page_size(&self, set: &ResourceSet) -> u64 {
        self.page_sizes
            .get(set.name())
            .copied()
            .unwrap_or(self.default_page_size)
    }

    pub fn set_use_verbose_errors(&mut self, verbose: bool) {
        self.use_verbose_errors = verbose;
    }

    /// Whether error payloads include internal detail.
    pub fn use_verbose_errors(&self) -> bool {
        self.use_verbose_errors
    }

    pub fn set_validate_etag_header(&mut self, validate: bool) {
        self.validate_etag_header = validate;
    }

    /// Whether conditional-request headers are checked against entity ETags.
    pub fn validate_etag_header(&self) -> bool {
        self.validate_etag_header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::EdmType;
    use crate::kind::ResourcePropertyKind;
    use crate::property::ResourceProperty;
    use crate::resource_type::ResourceType;

    fn customers_set() -> ResourceSet {
        let ty = ResourceType::entity("NorthWind", "Customer", "Customer");
        ty.add_property(
            ResourceProperty::new(
                "CustomerID",
                None,
                ResourcePropertyKind::PRIMITIVE.with_key(),
                ResourceType::primitive(EdmType::String),
            )
            .unwrap(),
        )
        .unwrap();
        ResourceSet::new("Customers", ty).unwrap()
    }

    #[test]
    fn verbose_errors_round_trip() {
        let mut config = ServiceConfiguration::new();
        assert!(!config.use_verbose_errors());
        config.set_use_verbose_errors(true);
        assert!(config.use_verbose_errors());
    }

    #[test]
    fn unbounded_page_size_normalizes_to_unlimited() {
        let mut config = ServiceConfiguration::new();
        config.set_entity_set_page_size("Customers", i64::MAX).unwrap();
        assert_eq!(config.entity_set_page_size(&customers_set()), PAGE_SIZE_UNLIMITED);
    }

    #[test]
    fn negative_page_size_is_a_configuration_error() {
        let mut config = ServiceConfiguration::new();
        assert!(matches!(
            config.set_entity_set_page_size("Customers", -1),
            Err(Error::InvalidPageSize(-1))
        ));
    }

    #[test]
    fn explicit_page_size_beats_default() {
        let mut config = ServiceConfiguration::new();
        config.set_default_page_size(25).unwrap();
        config.set_entity_set_page_size("Customers", 10).unwrap();
        assert_eq!(config.entity_set_page_size(&customers_set()), 10);
    }

    #[test]
    fn validate_etag_header_round_trip() {
        let mut config = ServiceConfiguration::new();
        assert!(config.validate_etag_header());
        config.set_validate_etag_header(false);
        assert!(!config.validate_etag_header());
    }
}
