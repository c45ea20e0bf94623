//! Filter parser - converts `$filter` text to a typed expression tree.
//!
//! Recursive descent over the OData operator precedence (lowest to
//! highest): `or`, `and`, comparison (`eq ne lt gt le ge`), additive
//! (`add sub`), multiplicative (`mul div mod`), unary (`not`, `-`),
//! primary. Operator words are contextual identifiers.
//!
//! Property tokens are resolved against the target resource type as they
//! are parsed, and every node gets its EDM type checked and fixed on the
//! spot, so a successfully parsed tree is fully typed.

use crate::ast::{BinaryOp, ConstantValue, Expression, ExpressionKind, UnaryOp};
use crate::error::{Error, Result};
use crate::filter::NavigationChain;
use crate::functions;
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use chrono::NaiveDateTime;
use odata_metadata::{EdmType, ResourcePropertyKind, ResourceType};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::str::FromStr;
use std::sync::Arc;

const MAX_RECURSION_DEPTH: usize = 100;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parser for one `$filter` expression against one target type.
pub struct FilterParser<'a> {
    lexer: Lexer,
    current: Token,
    target: &'a Arc<ResourceType>,
    navigation_chains: Vec<NavigationChain>,
    depth: usize,
}

impl<'a> FilterParser<'a> {
    pub fn new(input: &str, target: &'a Arc<ResourceType>) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            target,
            navigation_chains: Vec::new(),
            depth: 0,
        })
    }

    /// Parse the whole input. The resulting tree is guaranteed to be
    /// boolean-typed; anything else is a type error, since a filter is a
    /// predicate.
    pub fn parse(mut self) -> Result<(Expression, Vec<NavigationChain>)> {
        let expr = self.parse_expression()?;

        if self.current.token_type != TokenType::Eof {
            return Err(Error::Syntax {
                message: format!("Unexpected token '{}'", self.current.value),
                position: self.current.position,
            });
        }
        if !expr.type_is(EdmType::Boolean) {
            return Err(Error::Type(format!(
                "The filter expression must evaluate to a boolean value, not '{}'",
                expr.ty()
            )));
        }
        Ok((expr, self.navigation_chains))
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token> {
        if self.current.token_type != token_type {
            return Err(Error::Syntax {
                message: format!(
                    "Expected {:?}, got '{}'",
                    token_type, self.current.value
                ),
                position: self.current.position,
            });
        }
        let token = std::mem::replace(&mut self.current, Token::eof(0));
        self.advance()?;
        Ok(token)
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(Error::TooDeep(MAX_RECURSION_DEPTH));
        }
        let expr = self.parse_or();
        self.depth -= 1;
        expr
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.current.is_word("or") {
            self.advance()?;
            let right = self.parse_and()?;
            left = self.logical_node(BinaryOp::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_comparison()?;
        while self.current.is_word("and") {
            self.advance()?;
            let right = self.parse_comparison()?;
            left = self.logical_node(BinaryOp::And, left, right)?;
        }
        Ok(left)
    }

    fn logical_node(&self, op: BinaryOp, left: Expression, right: Expression) -> Result<Expression> {
        for operand in [&left, &right] {
            if !operand.type_is(EdmType::Boolean) {
                return Err(Error::Type(format!(
                    "Operator '{}' requires boolean operands, got '{}'",
                    op.odata_name(),
                    operand.ty()
                )));
            }
        }
        Ok(Expression::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            EdmType::Boolean,
        ))
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        if self.current.token_type != TokenType::Identifier {
            return None;
        }
        match self.current.value.as_str() {
            "eq" => Some(BinaryOp::Eq),
            "ne" => Some(BinaryOp::Ne),
            "lt" => Some(BinaryOp::Lt),
            "gt" => Some(BinaryOp::Gt),
            "le" => Some(BinaryOp::Le),
            "ge" => Some(BinaryOp::Ge),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.comparison_op() {
            self.advance()?;
            let right = self.parse_additive()?;
            self.check_relational(op, &left, &right)?;
            left = Expression::new(
                ExpressionKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                EdmType::Boolean,
            );
        }
        Ok(left)
    }

    fn check_relational(&self, op: BinaryOp, left: &Expression, right: &Expression) -> Result<()> {
        let (l, r) = (left.ty(), right.ty());
        if op.requires_ordering() {
            if l == EdmType::Null || r == EdmType::Null {
                return Err(Error::Type(format!(
                    "Operator '{}' cannot be applied to a null literal",
                    op.odata_name()
                )));
            }
            if !l.is_ordered() || !r.is_ordered() {
                return Err(Error::Type(format!(
                    "Operator '{}' is incompatible with operand types '{l}' and '{r}'",
                    op.odata_name()
                )));
            }
        }
        if !(l.accepts(r) || r.accepts(l)) {
            return Err(Error::Type(format!(
                "Operator '{}' is incompatible with operand types '{l}' and '{r}'",
                op.odata_name()
            )));
        }
        Ok(())
    }

    fn additive_op(&self) -> Option<BinaryOp> {
        match self.current.value.as_str() {
            "add" if self.current.token_type == TokenType::Identifier => Some(BinaryOp::Add),
            "sub" if self.current.token_type == TokenType::Identifier => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn multiplicative_op(&self) -> Option<BinaryOp> {
        if self.current.token_type != TokenType::Identifier {
            return None;
        }
        match self.current.value.as_str() {
            "mul" => Some(BinaryOp::Mul),
            "div" => Some(BinaryOp::Div),
            "mod" => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.additive_op() {
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = self.arithmetic_node(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.multiplicative_op() {
            self.advance()?;
            let right = self.parse_unary()?;
            left = self.arithmetic_node(op, left, right)?;
        }
        Ok(left)
    }

    fn arithmetic_node(
        &self,
        op: BinaryOp,
        left: Expression,
        right: Expression,
    ) -> Result<Expression> {
        let promoted = left.ty().promote_with(right.ty()).ok_or_else(|| {
            Error::Type(format!(
                "Operator '{}' is incompatible with operand types '{}' and '{}'",
                op.odata_name(),
                left.ty(),
                right.ty()
            ))
        })?;
        Ok(Expression::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            promoted,
        ))
    }

    // The unary productions recurse into themselves, so they carry the
    // depth counter too; parentheses alone are not the only way to nest.
    fn parse_unary(&mut self) -> Result<Expression> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(Error::TooDeep(MAX_RECURSION_DEPTH));
        }
        let expr = self.parse_unary_operand();
        self.depth -= 1;
        expr
    }

    fn parse_unary_operand(&mut self) -> Result<Expression> {
        if self.current.is_word("not") {
            self.advance()?;
            let operand = self.parse_unary()?;
            if !operand.type_is(EdmType::Boolean) {
                return Err(Error::Type(format!(
                    "Operator 'not' requires a boolean operand, got '{}'",
                    operand.ty()
                )));
            }
            return Ok(Expression::new(
                ExpressionKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                EdmType::Boolean,
            ));
        }
        if self.current.token_type == TokenType::Minus {
            self.advance()?;
            let operand = self.parse_unary()?;
            if !operand.ty().is_numeric() {
                return Err(Error::Type(format!(
                    "Unary '-' requires a numeric operand, got '{}'",
                    operand.ty()
                )));
            }
            let ty = operand.ty();
            return Ok(Expression::new(
                ExpressionKind::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(operand),
                },
                ty,
            ));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        match self.current.token_type {
            TokenType::OpenParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenType::CloseParen)?;
                Ok(expr)
            }
            TokenType::Identifier => {
                let token = self.expect(TokenType::Identifier)?;
                if self.current.token_type == TokenType::OpenParen {
                    self.parse_function_call(token)
                } else {
                    self.parse_property_path(token)
                }
            }
            _ => self.parse_literal(),
        }
    }

    fn parse_literal(&mut self) -> Result<Expression> {
        let token = std::mem::replace(&mut self.current, Token::eof(0));
        let (value, ty) = match token.token_type {
            TokenType::StringLiteral => (ConstantValue::String(token.value), EdmType::String),
            TokenType::BooleanLiteral => {
                (ConstantValue::Boolean(token.value == "true"), EdmType::Boolean)
            }
            TokenType::NullLiteral => (ConstantValue::Null, EdmType::Null),
            TokenType::IntegerLiteral => {
                let n = i64::from_str(&token.value).map_err(|_| Error::Syntax {
                    message: format!("Invalid integer literal '{}'", token.value),
                    position: token.position,
                })?;
                let ty = if i32::try_from(n).is_ok() {
                    EdmType::Int32
                } else {
                    EdmType::Int64
                };
                (ConstantValue::Integer(n), ty)
            }
            TokenType::Int64Literal => {
                let n = i64::from_str(&token.value).map_err(|_| Error::Syntax {
                    message: format!("Invalid Int64 literal '{}'", token.value),
                    position: token.position,
                })?;
                (ConstantValue::Integer(n), EdmType::Int64)
            }
            TokenType::SingleLiteral | TokenType::DoubleLiteral => {
                let n = f64::from_str(&token.value).map_err(|_| Error::Syntax {
                    message: format!("Invalid floating-point literal '{}'", token.value),
                    position: token.position,
                })?;
                let ty = if token.token_type == TokenType::SingleLiteral {
                    EdmType::Single
                } else {
                    EdmType::Double
                };
                (ConstantValue::Float(n), ty)
            }
            TokenType::DecimalLiteral => {
                let d = Decimal::from_str(&token.value).map_err(|_| Error::Syntax {
                    message: format!("Invalid decimal literal '{}'", token.value),
                    position: token.position,
                })?;
                (ConstantValue::Decimal(d), EdmType::Decimal)
            }
            TokenType::DateTimeLiteral => {
                let parsed = DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(&token.value, fmt).ok())
                    .ok_or_else(|| Error::Syntax {
                        message: format!("Invalid datetime literal '{}'", token.value),
                        position: token.position,
                    })?;
                (ConstantValue::DateTime(parsed), EdmType::DateTime)
            }
            TokenType::GuidLiteral => {
                if !is_valid_guid(&token.value) {
                    return Err(Error::Syntax {
                        message: format!("Invalid guid literal '{}'", token.value),
                        position: token.position,
                    });
                }
                (ConstantValue::Guid(token.value), EdmType::Guid)
            }
            TokenType::BinaryLiteral => {
                let bytes = decode_hex(&token.value).ok_or_else(|| Error::Syntax {
                    message: format!("Invalid binary literal '{}'", token.value),
                    position: token.position,
                })?;
                (ConstantValue::Binary(bytes), EdmType::Binary)
            }
            _ => {
                return Err(Error::Syntax {
                    message: format!("Unexpected token '{}'", token.value),
                    position: token.position,
                })
            }
        };
        self.advance()?;
        Ok(Expression::new(ExpressionKind::Constant(value), ty))
    }

    fn parse_function_call(&mut self, name_token: Token) -> Result<Expression> {
        if !functions::is_function(&name_token.value) {
            return Err(Error::UnknownFunction(name_token.value));
        }
        self.expect(TokenType::OpenParen)?;
        let mut args = Vec::new();
        if self.current.token_type != TokenType::CloseParen {
            loop {
                args.push(self.parse_expression()?);
                if self.current.token_type == TokenType::Comma {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenType::CloseParen)?;

        let arg_types: Vec<EdmType> = args.iter().map(Expression::ty).collect();
        let signature = functions::resolve(&name_token.value, &arg_types)?;
        Ok(Expression::new(
            ExpressionKind::FunctionCall {
                name: signature.name,
                args,
            },
            signature.return_type,
        ))
    }

    /// Resolve an `A/B/C` access path against the target type, collecting
    /// the navigation properties traversed along the way.
    fn parse_property_path(&mut self, first: Token) -> Result<Expression> {
        let mut segments = vec![first.value];
        while self.current.token_type == TokenType::Slash {
            self.advance()?;
            segments.push(self.expect(TokenType::Identifier)?.value);
        }

        let mut current_type = Arc::clone(self.target);
        let mut chain: NavigationChain = SmallVec::new();
        let last = segments.len() - 1;

        for (index, name) in segments.iter().enumerate() {
            let property = current_type.resolve_property(name).ok_or_else(|| {
                Error::UnknownProperty {
                    name: name.clone(),
                    type_name: current_type.full_name(),
                }
            })?;

            if index < last {
                if property.is_kind_of(ResourcePropertyKind::RESOURCE_REFERENCE) {
                    chain.push(name.clone());
                } else if !property.is_kind_of(ResourcePropertyKind::COMPLEX_TYPE)
                    || property.is_kind_of(ResourcePropertyKind::BAG)
                {
                    // Set references, bags and primitives cannot be
                    // traversed further in a filter path.
                    return Err(Error::PropertyNotTraversable {
                        name: name.clone(),
                        type_name: current_type.full_name(),
                    });
                }
                current_type = Arc::clone(property.resource_type());
                continue;
            }

            // Leaf of the path: must be a scalar primitive.
            if !property.is_kind_of(ResourcePropertyKind::PRIMITIVE)
                || property.is_kind_of(ResourcePropertyKind::BAG)
            {
                return Err(Error::LeafNotPrimitive { name: name.clone() });
            }
            let ty = property
                .resource_type()
                .edm_type()
                .ok_or_else(|| Error::LeafNotPrimitive { name: name.clone() })?;

            if !chain.is_empty() && !self.navigation_chains.contains(&chain) {
                self.navigation_chains.push(chain.clone());
            }
            return Ok(Expression::new(
                ExpressionKind::Property {
                    segments: segments.clone(),
                    property,
                },
                ty,
            ));
        }
        unreachable!("property path has at least one segment")
    }
}

fn is_valid_guid(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    let lengths = [8, 4, 4, 4, 12];
    groups.len() == lengths.len()
        && groups
            .iter()
            .zip(lengths)
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()))
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(value.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;
    use odata_metadata::{EdmType, ResourceProperty, ResourceType};

    fn person_type() -> Arc<ResourceType> {
        let person = ResourceType::entity("Test", "Person", "Person");
        let add_primitive = |name: &str, edm: EdmType| {
            person
                .add_property(
                    ResourceProperty::new(
                        name,
                        None,
                        ResourcePropertyKind::PRIMITIVE,
                        ResourceType::primitive(edm),
                    )
                    .unwrap(),
                )
                .unwrap();
        };
        add_primitive("Age", EdmType::Int32);
        add_primitive("Name", EdmType::String);
        add_primitive("Active", EdmType::Boolean);
        add_primitive("BirthDate", EdmType::DateTime);
        add_primitive("Rating", EdmType::Double);
        person
    }

    fn parse(input: &str) -> Result<(Expression, Vec<NavigationChain>)> {
        let ty = person_type();
        FilterParser::new(input, &ty)?.parse()
    }

    #[test]
    fn simple_comparison_is_boolean_typed() {
        let (expr, chains) = parse("Age gt 18").unwrap();
        assert_eq!(expr.node_type(), NodeType::Binary);
        assert!(expr.type_is(EdmType::Boolean));
        assert!(chains.is_empty());
    }

    #[test]
    fn precedence_binds_and_tighter_than_or() {
        let (expr, _) = parse("Active or Age gt 18 and Name eq 'Bob'").unwrap();
        match expr.kind() {
            ExpressionKind::Binary { op, .. } => assert_eq!(*op, BinaryOp::Or),
            other => panic!("expected binary node, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_promotes_operand_types() {
        let (expr, _) = parse("Age add 1.5 gt 20").unwrap();
        match expr.kind() {
            ExpressionKind::Binary { left, .. } => assert!(left.type_is(EdmType::Double)),
            other => panic!("expected binary node, got {other:?}"),
        }
    }

    #[test]
    fn unknown_property_names_the_offender() {
        let err = parse("Salary gt 18").unwrap_err();
        match err {
            Error::UnknownProperty { name, type_name } => {
                assert_eq!(name, "Salary");
                assert_eq!(type_name, "Test.Person");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn incompatible_operand_types_are_rejected() {
        assert!(matches!(parse("Name lt Active"), Err(Error::Type(_))));
        assert!(matches!(parse("Name eq 5"), Err(Error::Type(_))));
        assert!(matches!(parse("Active lt true"), Err(Error::Type(_))));
    }

    #[test]
    fn logical_operators_require_boolean_operands() {
        assert!(matches!(parse("Age and Active"), Err(Error::Type(_))));
        assert!(matches!(parse("not Age"), Err(Error::Type(_))));
    }

    #[test]
    fn non_boolean_filter_is_rejected() {
        assert!(matches!(parse("Age add 1"), Err(Error::Type(_))));
    }

    #[test]
    fn null_comparisons_allow_eq_but_not_ordering() {
        assert!(parse("Name eq null").is_ok());
        assert!(matches!(parse("Age gt null"), Err(Error::Type(_))));
    }

    #[test]
    fn function_calls_type_check() {
        let (expr, _) = parse("startswith(Name, 'A')").unwrap();
        assert_eq!(expr.node_type(), NodeType::FunctionCall);
        assert!(parse("year(BirthDate) eq 1990").is_ok());
        assert!(matches!(
            parse("startswith(Age, 'A')"),
            Err(Error::NoMatchingOverload { .. })
        ));
        assert!(matches!(
            parse("shout(Name)"),
            Err(Error::UnknownFunction(_))
        ));
    }

    #[test]
    fn negative_literals_parse() {
        assert!(parse("Age gt -5").is_ok());
        assert!(parse("Rating lt -1.5").is_ok());
    }

    #[test]
    fn datetime_literals_compare_with_datetime_properties() {
        assert!(parse("BirthDate lt datetime'1990-06-15T00:00:00'").is_ok());
        assert!(matches!(
            parse("BirthDate lt datetime'not-a-date'"),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn trailing_tokens_are_a_syntax_error() {
        assert!(matches!(parse("Age gt 18 18"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("(Age gt 18"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn long_not_chains_are_bounded() {
        let mut input = "not ".repeat(100_000);
        input.push_str("Active");
        assert!(matches!(parse(&input), Err(Error::TooDeep(_))));
    }

    #[test]
    fn long_negation_chains_are_bounded() {
        let mut input = "-".repeat(100_000);
        input.push_str("Age gt 18");
        assert!(matches!(parse(&input), Err(Error::TooDeep(_))));
    }

    #[test]
    fn deeply_nested_expressions_are_bounded() {
        let mut input = String::new();
        for _ in 0..200 {
            input.push_str("not (");
        }
        input.push_str("Active");
        for _ in 0..200 {
            input.push(')');
        }
        assert!(matches!(parse(&input), Err(Error::TooDeep(_))));
    }
}
