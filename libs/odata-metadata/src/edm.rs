//! EDM primitive type system.
//!
//! Every primitive value in the protocol is described by one of the EDM
//! types below. Expression type checking compares types by their stable
//! code and uses the numeric promotion lattice when combining operands.

/// An EDM primitive type.
///
/// The discriminant is the stable type code; two type descriptors denote
/// the same type iff their codes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EdmType {
    Binary = 1,
    Boolean = 2,
    Byte = 3,
    DateTime = 4,
    Decimal = 5,
    Double = 6,
    Guid = 7,
    Int16 = 8,
    Int32 = 9,
    Int64 = 10,
    SByte = 11,
    Single = 12,
    String = 13,
    /// The type of the `null` literal; equality-comparable with anything.
    Null = 14,
}

impl EdmType {
    /// Stable type code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Type-code equality, the `typeIs` relation of the expression tree.
    pub fn same_as(self, other: EdmType) -> bool {
        self.code() == other.code()
    }

    /// Full EDM name, e.g. `Edm.Int32`.
    pub fn full_name(self) -> &'static str {
        match self {
            EdmType::Binary => "Edm.Binary",
            EdmType::Boolean => "Edm.Boolean",
            EdmType::Byte => "Edm.Byte",
            EdmType::DateTime => "Edm.DateTime",
            EdmType::Decimal => "Edm.Decimal",
            EdmType::Double => "Edm.Double",
            EdmType::Guid => "Edm.Guid",
            EdmType::Int16 => "Edm.Int16",
            EdmType::Int32 => "Edm.Int32",
            EdmType::Int64 => "Edm.Int64",
            EdmType::SByte => "Edm.SByte",
            EdmType::Single => "Edm.Single",
            EdmType::String => "Edm.String",
            EdmType::Null => "Edm.Null",
        }
    }

    /// Unqualified name, e.g. `Int32`.
    pub fn name(self) -> &'static str {
        self.full_name()
            .strip_prefix("Edm.")
            .unwrap_or(self.full_name())
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            EdmType::Byte
                | EdmType::SByte
                | EdmType::Int16
                | EdmType::Int32
                | EdmType::Int64
                | EdmType::Single
                | EdmType::Double
                | EdmType::Decimal
        )
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            EdmType::Byte | EdmType::SByte | EdmType::Int16 | EdmType::Int32 | EdmType::Int64
        )
    }

    /// Whether `lt`/`gt`/`le`/`ge` apply to values of this type.
    pub fn is_ordered(self) -> bool {
        self.is_numeric() || matches!(self, EdmType::String | EdmType::DateTime)
    }

    /// Whether `eq`/`ne` apply to values of this type.
    pub fn is_equality_comparable(self) -> bool {
        // Every primitive supports equality; Null compares with anything.
        true
    }

    fn numeric_rank(self) -> Option<u8> {
        match self {
            EdmType::Byte | EdmType::SByte => Some(1),
            EdmType::Int16 => Some(2),
            EdmType::Int32 => Some(3),
            EdmType::Int64 => Some(4),
            EdmType::Single => Some(5),
            EdmType::Double => Some(6),
            EdmType::Decimal => Some(7),
            _ => None,
        }
    }

    /// The common type two numeric operands promote to, if any.
    ///
    /// Integral types widen towards `Int64`, then to the floating types.
    /// `Decimal` accepts integral operands but does not mix with `Single`
    /// or `Double`; that combination is a type error, not a coercion.
    pub fn promote_with(self, other: EdmType) -> Option<EdmType> {
        let a = self.numeric_rank()?;
        let b = other.numeric_rank()?;
        let wider = if a >= b { self } else { other };
        if wider == EdmType::Decimal {
            let narrower = if a >= b { other } else { self };
            if !(narrower.is_integral() || narrower == EdmType::Decimal) {
                return None;
            }
        }
        Some(wider)
    }

    /// Whether an operand of `other` can stand where `self` is expected,
    /// either exactly, by numeric promotion, or by a `null` comparison.
    pub fn accepts(self, other: EdmType) -> bool {
        if self.same_as(other) || other == EdmType::Null || self == EdmType::Null {
            return true;
        }
        self.promote_with(other).is_some()
    }
}

impl std::fmt::Display for EdmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.full_name())
    }
}
