//! The typed filter expression tree.
//!
//! Every node carries its resolved EDM type, fixed when the parser builds
//! the node. Nodes own their children; the whole tree is dropped with its
//! root, so there is no explicit release step.

use chrono::NaiveDateTime;
use odata_metadata::{EdmType, ResourceProperty};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Node-kind tag, for dispatch without matching the full node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Property,
    Constant,
    Unary,
    Binary,
    FunctionCall,
}

/// Binary operators, logical and relational and arithmetic alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// The operator word as it appears in `$filter` text.
    pub fn odata_name(self) -> &'static str {
        match self {
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::Lt => "lt",
            BinaryOp::Gt => "gt",
            BinaryOp::Le => "le",
            BinaryOp::Ge => "ge",
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    /// Whether this relational operator requires ordered operands
    /// (`lt`/`gt`/`le`/`ge` as opposed to `eq`/`ne`).
    pub fn requires_ordering(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

/// A literal value; the node's EDM type narrows the numeric variants
/// (e.g. `Integer` serves both `Edm.Int32` and `Edm.Int64`).
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    DateTime(NaiveDateTime),
    Guid(String),
    Binary(Vec<u8>),
}

/// The payload of an expression node.
#[derive(Debug, Clone)]
pub enum ExpressionKind {
    /// A property access, possibly through a navigation/complex path.
    /// `segments` is the full path including the leaf.
    Property {
        segments: Vec<String>,
        property: Arc<ResourceProperty>,
    },
    Constant(ConstantValue),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    FunctionCall {
        name: &'static str,
        args: Vec<Expression>,
    },
}

/// A type-resolved expression node.
#[derive(Debug, Clone)]
pub struct Expression {
    kind: ExpressionKind,
    ty: EdmType,
}

impl Expression {
    pub(crate) fn new(kind: ExpressionKind, ty: EdmType) -> Self {
        Self { kind, ty }
    }

    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            ExpressionKind::Property { .. } => NodeType::Property,
            ExpressionKind::Constant(_) => NodeType::Constant,
            ExpressionKind::Unary { .. } => NodeType::Unary,
            ExpressionKind::Binary { .. } => NodeType::Binary,
            ExpressionKind::FunctionCall { .. } => NodeType::FunctionCall,
        }
    }

    /// The resolved EDM type. Set once at construction, never changed.
    pub fn ty(&self) -> EdmType {
        self.ty
    }

    /// Type-code equality with another EDM type.
    pub fn type_is(&self, ty: EdmType) -> bool {
        self.ty.same_as(ty)
    }
}
