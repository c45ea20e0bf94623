//! OData `$filter` expression engine.
//!
//! Pipeline: filter text is tokenized ([`lexer`]), parsed into a typed
//! tree with properties resolved against the target resource type
//! ([`parser`]), and rendered into a provider expression language
//! ([`renderer`]).
//!
//! ```text
//! $filter text
//!      |
//!   Lexer -> tokens
//!      |
//!   Parser -> typed Expression (properties bound, EDM types checked)
//!      |
//!   Renderer -> FilterInfo (predicate + navigation chains)
//! ```
//!
//! The usual entry point is [`parse_filter`], which runs the whole
//! pipeline and maps failures to protocol errors.

pub mod ast;
pub mod error;
pub mod filter;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod renderer;
pub mod token;

pub use ast::{BinaryOp, ConstantValue, Expression, ExpressionKind, NodeType, UnaryOp};
pub use error::{Error, Result};
pub use filter::{parse_filter, FilterInfo, NavigationChain};
pub use parser::FilterParser;
pub use renderer::{ExpressionRenderer, NativeExpressionRenderer};
