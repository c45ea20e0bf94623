//! OData protocol version.

use crate::error::ODataError;
use std::fmt;

/// An OData protocol version, as carried by the `DataServiceVersion` and
/// `MaxDataServiceVersion` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u16,
    minor: u16,
}

impl Version {
    pub const V1: Version = Version { major: 1, minor: 0 };
    pub const V2: Version = Version { major: 2, minor: 0 };
    pub const V3: Version = Version { major: 3, minor: 0 };

    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// Raise this version to `other` if `other` is greater.
    pub fn raise_to(&mut self, other: Version) {
        if other > *self {
            *self = other;
        }
    }

    /// Parse a version header value such as `3.0` or `2.0;NetFx`.
    ///
    /// Anything after the first `;` is a user-agent string and ignored.
    pub fn parse(value: &str) -> Result<Self, ODataError> {
        let number = value.split(';').next().unwrap_or("").trim();
        let mut parts = number.split('.');
        let major = parts.next().and_then(|p| p.parse::<u16>().ok());
        let minor = parts.next().and_then(|p| p.parse::<u16>().ok());
        match (major, minor, parts.next()) {
            (Some(major), Some(minor), None) => Ok(Self { major, minor }),
            _ => Err(ODataError::bad_request(format!(
                "The version value '{value}' in the header is invalid."
            ))),
        }
    }

    /// The header form the dispatcher writes, e.g. `3.0;`.
    pub fn to_header_value(self) -> String {
        format!("{self};")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
