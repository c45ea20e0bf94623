//! Structural kinds for resource types and properties.
//!
//! `ResourcePropertyKind` is a closed flag algebra: four base kinds plus
//! three modifier flags, with an exhaustive legality table. Constructing a
//! `ResourceProperty` rejects anything outside that table, so an illegal
//! bit combination can never enter the metadata graph.

use std::fmt;

/// The kind of a resource type: primitive wrapper, complex type, or entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTypeKind {
    Primitive,
    Complex,
    Entity,
}

impl fmt::Display for ResourceTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceTypeKind::Primitive => f.write_str("Primitive"),
            ResourceTypeKind::Complex => f.write_str("Complex"),
            ResourceTypeKind::Entity => f.write_str("Entity"),
        }
    }
}

/// The bitmask-encoded role of a property.
///
/// Base kinds: `PRIMITIVE`, `COMPLEX_TYPE`, `RESOURCE_REFERENCE`,
/// `RESOURCESET_REFERENCE`. Modifiers: `BAG` (on primitive or complex),
/// `KEY` and `ETAG` (on primitive only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcePropertyKind(u8);

impl ResourcePropertyKind {
    pub const PRIMITIVE: ResourcePropertyKind = ResourcePropertyKind(1);
    pub const COMPLEX_TYPE: ResourcePropertyKind = ResourcePropertyKind(1 << 1);
    pub const RESOURCE_REFERENCE: ResourcePropertyKind = ResourcePropertyKind(1 << 2);
    pub const RESOURCESET_REFERENCE: ResourcePropertyKind = ResourcePropertyKind(1 << 3);
    pub const BAG: ResourcePropertyKind = ResourcePropertyKind(1 << 4);
    pub const KEY: ResourcePropertyKind = ResourcePropertyKind(1 << 5);
    pub const ETAG: ResourcePropertyKind = ResourcePropertyKind(1 << 6);

    /// Every kind value the legality table admits.
    const LEGAL: [ResourcePropertyKind; 8] = [
        Self::RESOURCE_REFERENCE,
        Self::RESOURCESET_REFERENCE,
        Self::COMPLEX_TYPE,
        Self::COMPLEX_TYPE.with(Self::BAG),
        Self::PRIMITIVE,
        Self::PRIMITIVE.with(Self::BAG),
        Self::PRIMITIVE.with(Self::KEY),
        Self::PRIMITIVE.with(Self::ETAG),
    ];

    /// Rebuild a kind from raw bits. `None` when the bits are not in the
    /// legality table.
    pub fn from_bits(bits: u8) -> Option<ResourcePropertyKind> {
        let kind = ResourcePropertyKind(bits);
        kind.is_valid().then_some(kind)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    const fn with(self, flag: ResourcePropertyKind) -> ResourcePropertyKind {
        ResourcePropertyKind(self.0 | flag.0)
    }

    pub const fn with_bag(self) -> ResourcePropertyKind {
        self.with(Self::BAG)
    }

    pub const fn with_key(self) -> ResourcePropertyKind {
        self.with(Self::KEY)
    }

    pub const fn with_etag(self) -> ResourcePropertyKind {
        self.with(Self::ETAG)
    }

    /// Bitwise containment: `a.is_kind_of(b)` iff every bit of `b` is set
    /// in `a`. Reflexive by construction.
    pub const fn is_kind_of(self, other: ResourcePropertyKind) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Structural legality: exactly the four base kinds plus the four
    /// flag-augmented primitive/complex combinations, nothing else.
    pub fn is_valid(self) -> bool {
        Self::LEGAL.contains(&self)
    }
}

impl fmt::Display for ResourcePropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for (flag, label) in [
            (Self::PRIMITIVE, "Primitive"),
            (Self::COMPLEX_TYPE, "ComplexType"),
            (Self::RESOURCE_REFERENCE, "ResourceReference"),
            (Self::RESOURCESET_REFERENCE, "ResourceSetReference"),
            (Self::BAG, "Bag"),
            (Self::KEY, "Key"),
            (Self::ETAG, "ETag"),
        ] {
            if self.is_kind_of(flag) {
                parts.push(label);
            }
        }
        if parts.is_empty() {
            return write!(f, "Invalid({:#04x})", self.0);
        }
        f.write_str(&parts.join("+"))
    }
}

/// Cross-check of a property kind against the kind of the resource type it
/// decorates: primitive-kind properties require a primitive type, complex
/// requires complex, both reference kinds require an entity type.
pub fn is_resource_kind_valid_for_property_kind(
    property_kind: ResourcePropertyKind,
    resource_type_kind: ResourceTypeKind,
) -> bool {
    if property_kind.is_kind_of(ResourcePropertyKind::PRIMITIVE)
        && resource_type_kind != ResourceTypeKind::Primitive
    {
        return false;
    }
    if property_kind.is_kind_of(ResourcePropertyKind::COMPLEX_TYPE)
        && resource_type_kind != ResourceTypeKind::Complex
    {
        return false;
    }
    if (property_kind.is_kind_of(ResourcePropertyKind::RESOURCE_REFERENCE)
        || property_kind.is_kind_of(ResourcePropertyKind::RESOURCESET_REFERENCE))
        && resource_type_kind != ResourceTypeKind::Entity
    {
        return false;
    }
    true
}
