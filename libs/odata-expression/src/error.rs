//! Error types for the expression engine.
//!
//! Everything here is a client-caused query error; the `From` conversion
//! maps the whole enum onto the protocol taxonomy's bad-request variant.

use odata_common::ODataError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Syntax error at position {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("No property named '{name}' exists on type '{type_name}'")]
    UnknownProperty { name: String, type_name: String },

    #[error("Property '{name}' on type '{type_name}' cannot be traversed in a filter path")]
    PropertyNotTraversable { name: String, type_name: String },

    #[error("Filter path must end on a primitive property, but '{name}' is not primitive")]
    LeafNotPrimitive { name: String },

    #[error("Type error: {0}")]
    Type(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("No overload of '{name}' accepts the argument types ({argument_types})")]
    NoMatchingOverload {
        name: String,
        argument_types: String,
    },

    #[error("Expression is too deeply nested (max depth: {0})")]
    TooDeep(usize),
}

impl From<Error> for ODataError {
    fn from(err: Error) -> ODataError {
        ODataError::syntax_error(err.to_string())
    }
}
