//! Rendering of typed expression trees into target expression languages.
//!
//! A renderer supplies one method per node shape; the recursive walk is
//! shared by the trait's provided `render`. The built-in
//! [`NativeExpressionRenderer`] emits conventional infix syntax
//! (`(Age > 18)`, `&&`, `!`), which suits in-memory providers and is a
//! readable canonical form for logging and tests.

use crate::ast::{BinaryOp, ConstantValue, Expression, ExpressionKind, UnaryOp};

pub trait ExpressionRenderer {
    fn render_binary(&self, op: BinaryOp, left: &str, right: &str) -> String;
    fn render_unary(&self, op: UnaryOp, operand: &str) -> String;
    fn render_property(&self, segments: &[String]) -> String;
    fn render_constant(&self, value: &ConstantValue) -> String;
    fn render_function_call(&self, name: &str, args: &[String]) -> String;

    fn render(&self, expr: &Expression) -> String {
        match expr.kind() {
            ExpressionKind::Binary { op, left, right } => {
                let left = self.render(left);
                let right = self.render(right);
                self.render_binary(*op, &left, &right)
            }
            ExpressionKind::Unary { op, operand } => {
                let operand = self.render(operand);
                self.render_unary(*op, &operand)
            }
            ExpressionKind::Property { segments, .. } => self.render_property(segments),
            ExpressionKind::Constant(value) => self.render_constant(value),
            ExpressionKind::FunctionCall { name, args } => {
                let args: Vec<String> = args.iter().map(|arg| self.render(arg)).collect();
                self.render_function_call(name, &args)
            }
        }
    }
}

/// Renderer producing infix expressions with C-style operators.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeExpressionRenderer;

impl NativeExpressionRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn native_operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Ge => ">=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
    }
}

impl ExpressionRenderer for NativeExpressionRenderer {
    fn render_binary(&self, op: BinaryOp, left: &str, right: &str) -> String {
        format!("({left} {} {right})", native_operator(op))
    }

    fn render_unary(&self, op: UnaryOp, operand: &str) -> String {
        match op {
            UnaryOp::Not => format!("!({operand})"),
            UnaryOp::Negate => format!("-({operand})"),
        }
    }

    fn render_property(&self, segments: &[String]) -> String {
        segments.join(".")
    }

    fn render_constant(&self, value: &ConstantValue) -> String {
        match value {
            ConstantValue::Null => "null".to_string(),
            ConstantValue::Boolean(b) => b.to_string(),
            ConstantValue::Integer(n) => n.to_string(),
            ConstantValue::Float(n) => n.to_string(),
            ConstantValue::Decimal(d) => d.to_string(),
            ConstantValue::String(s) => format!("'{}'", s.replace('\'', "\\'")),
            ConstantValue::DateTime(dt) => {
                format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S"))
            }
            ConstantValue::Guid(g) => format!("'{g}'"),
            ConstantValue::Binary(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("'{hex}'")
            }
        }
    }

    fn render_function_call(&self, name: &str, args: &[String]) -> String {
        format!("{name}({})", args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_render_in_native_form() {
        let renderer = NativeExpressionRenderer::new();
        assert_eq!(renderer.render_constant(&ConstantValue::Null), "null");
        assert_eq!(renderer.render_constant(&ConstantValue::Boolean(true)), "true");
        assert_eq!(renderer.render_constant(&ConstantValue::Integer(-42)), "-42");
        assert_eq!(
            renderer.render_constant(&ConstantValue::String("O'Brien".into())),
            "'O\\'Brien'"
        );
    }

    #[test]
    fn binary_nodes_are_parenthesized() {
        let renderer = NativeExpressionRenderer::new();
        assert_eq!(renderer.render_binary(BinaryOp::Gt, "Age", "18"), "(Age > 18)");
        assert_eq!(renderer.render_binary(BinaryOp::And, "a", "b"), "(a && b)");
    }

    #[test]
    fn property_paths_use_dots() {
        let renderer = NativeExpressionRenderer::new();
        let segments = vec!["Owner".to_string(), "Age".to_string()];
        assert_eq!(renderer.render_property(&segments), "Owner.Age");
    }
}
