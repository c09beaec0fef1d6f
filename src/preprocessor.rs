//! # Text Preprocessing
//!
//! Transformations applied to whole strings around the expansion loop.
//!
//! ## Position in the Pipeline
//!
//! ```text
//! Input → Fixed-Point Driver (Span Matcher → Evaluator)* → Unescape → Output
//! ```
//!
//! The only transformation today is [`Unescape`], which turns `\{` back into
//! a literal `{` once expansion has converged. `\}` is left alone.

use crate::span::{ESCAPE, OPEN};

/// A trait for preprocessing different types of input
pub trait Preprocessor<T, U = T> {
    /// Process the input of type T and return the processed result
    fn process(&self, input: T) -> U;
}

/// Replaces every `\{` with `{` in a single left-to-right pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unescape;

impl Unescape {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor<&str, String> for Unescape {
    fn process(&self, input: &str) -> String {
        let escaped = [ESCAPE as char, OPEN as char].iter().collect::<String>();
        input.replace(&escaped, &(OPEN as char).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        let unescape = Unescape::new();
        assert_eq!(unescape.process(r"\{notAnExpr}"), "{notAnExpr}");
        assert_eq!(unescape.process(r"a\{b\{c"), "a{b{c");
        assert_eq!(unescape.process("plain"), "plain");
    }

    #[test]
    fn test_close_brace_not_unescaped() {
        assert_eq!(Unescape.process(r"\{x\}"), r"{x\}");
    }

    #[test]
    fn test_single_pass() {
        // `\\{` は `\{` になり、再度は処理されない
        assert_eq!(Unescape.process(r"\\{"), r"\{");
    }
}
