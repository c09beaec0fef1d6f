//! # KAKKO: Bracketed Expression Expansion
//!
//! KAKKO expands `{opcode:operand1|operand2|...}` expressions embedded in
//! ordinary text. Each expression is dispatched to a named operation and
//! replaced by its output; expansion repeats until the text stops changing,
//! so operations may produce further expressions and expressions may nest.
//!
//! ```text
//! "{set:who|world}Hello, {get:who}! {repeat:ab|2}"  →  "Hello, world! abab"
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Input → Span Matcher → Evaluator → Substitution ─┐
//!           ↑                                      │  until a pass changes nothing
//!           └──────────────────────────────────────┘
//!       → Unescape (`\{` → `{`) → Output
//! ```
//!
//! - Span matching ([`span`]): the first `}` paired with the nearest unescaped `{` before it
//! - Evaluation ([`eval`]): opcode lookup, requirement checks, execution
//! - Operations ([`operation`]): the [`Operation`] trait, registry and built-ins
//! - Driver ([`parser`]): the fixed-point loop with a configurable pass limit
//!
//! ## Failure Model
//!
//! Expansion never fails on bad expressions. Unknown opcodes pass through
//! untouched, failed requirements leave the expression in place and record a
//! diagnostic, and operations report their own failures as diagnostics. The
//! only error a parse returns is [`ParseError::NonConvergent`].
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), kakko::ParseError> {
//! let parser = kakko::Parser::default();
//! let parsed = parser.parse("{add:1|2|3}").await?;
//! assert_eq!(parsed.text, "6");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod eval;
pub mod operation;
pub mod parser;
pub mod preprocessor;
pub mod span;

// Re-exports
pub use config::ParserConfig;
pub use error::*;
pub use eval::{context::EvaluationContext, evaluator::Evaluator, expression::Expression};
pub use operation::{
    registry::{OperationRegistry, RegistryBuilder},
    types::{Operation, Requirement},
};
pub use parser::{ParseError, Parsed, Parser};
