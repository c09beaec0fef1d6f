//! Operations callable from expressions.
//!
//! - [`types`]: the [`types::Operation`] trait and [`types::Requirement`] checks
//! - [`registry`]: the immutable opcode table and its builder
//! - [`builtins`]: `add`, `e`, `pi`, `get`, `set`, `note`, `repeat`, `text`

pub mod builtins;
pub mod registry;
pub mod types;
