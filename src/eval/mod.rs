//! Expression evaluation.
//!
//! # Core Components
//!
//! ## Expression
//! An occurrence split into its opcode and `|`-separated operands, able to
//! re-serialize itself back into span text.
//!
//! ## Evaluation Context
//! Per-parse state: positional arguments, the value store used by `get` and
//! `set`, and the ordered error log.
//!
//! ## Evaluator
//! Looks the opcode up in the [`crate::operation::registry::OperationRegistry`],
//! runs its requirements in order and, when all pass, awaits the executor.
//!
//! # Failure Handling
//!
//! 1. Unknown opcode: the occurrence is returned as written, nothing is logged
//! 2. Failed requirement: the occurrence is returned as written, the reason is logged
//! 3. Failing executor: the operation logs the reason itself and returns a fallback

pub mod context;
pub mod evaluator;
pub mod expression;
