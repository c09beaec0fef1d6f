use std::fmt;

pub const DIVIDER: char = ':';
pub const SEPARATOR: char = '|';

/// An expression occurrence split into opcode and operands.
///
/// Only the first `:` divides the opcode from the operand block, so
/// `{text:http://example.com}` has the single operand `http://example.com`.
/// An empty or missing operand block still yields one empty operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub opcode: String,
    pub operands: Vec<String>,
    divided: bool,
}

impl Expression {
    pub fn new<S: Into<String>>(opcode: S, operands: Vec<String>) -> Self {
        let divided = !operands.is_empty();
        Self {
            opcode: opcode.into(),
            operands,
            divided,
        }
    }

    /// Splits the raw text between the braces.
    pub fn parse(inner: &str) -> Self {
        match inner.split_once(DIVIDER) {
            Some((opcode, block)) => Self {
                opcode: opcode.to_string(),
                operands: block.split(SEPARATOR).map(str::to_string).collect(),
                divided: true,
            },
            None => Self {
                opcode: inner.to_string(),
                operands: vec![String::new()],
                divided: false,
            },
        }
    }

    /// Operand at `index`, or the empty string when absent.
    pub fn operand(&self, index: usize) -> &str {
        self.operands.get(index).map(String::as_str).unwrap_or("")
    }

    /// Re-serializes into span text, braces included.
    ///
    /// For anything produced by [`Expression::parse`] this reproduces the
    /// source span exactly.
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.divided && !self.operands.is_empty() {
            write!(
                f,
                "{{{}{}{}}}",
                self.opcode,
                DIVIDER,
                self.operands.join(&SEPARATOR.to_string())
            )
        } else {
            write!(f, "{{{}}}", self.opcode)
        }
    }
}
