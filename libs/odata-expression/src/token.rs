//! Token types for the filter lexer.

/// Token types produced from `$filter` text.
///
/// OData operator words (`and`, `eq`, `not`, ...) are contextual and come
/// out of the lexer as plain identifiers; the parser gives them meaning.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum TokenType {
    // Literals
    StringLiteral,
    IntegerLiteral,
    Int64Literal,
    SingleLiteral,
    DoubleLiteral,
    DecimalLiteral,
    DateTimeLiteral,
    GuidLiteral,
    BinaryLiteral,
    BooleanLiteral,
    NullLiteral,

    // Identifiers (property names, function names, operator words)
    Identifier,

    // Delimiters
    OpenParen,  // (
    CloseParen, // )
    Comma,      // ,
    Slash,      // /
    Minus,      // -

    // End of input
    Eof,
}

/// A token in the filter expression.
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: String, position: usize) -> Self {
        Self {
            token_type,
            value,
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self {
            token_type: TokenType::Eof,
            value: String::new(),
            position,
        }
    }

    /// Whether this token is the given operator word.
    pub fn is_word(&self, word: &str) -> bool {
        self.token_type == TokenType::Identifier && self.value == word
    }
}
