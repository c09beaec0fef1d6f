//! Fixed-point expansion driver.
//!
//! Each pass walks the working string left to right, evaluating every span
//! [`find_span_from`] yields and splicing the result in its place. Output of
//! a pass is not rescanned until the next pass, so nested expressions resolve
//! from the inside out, one level per pass. A pass ends early once an inner
//! span inside a still-open `{` changes, so the enclosing expression runs
//! before the expressions to its right. Expansion stops at the first pass
//! that leaves the string unchanged; after that `\{` is unescaped once.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::eval::{context::EvaluationContext, evaluator::Evaluator, expression::Expression};
use crate::operation::registry::OperationRegistry;
use crate::preprocessor::{Preprocessor, Unescape};
use crate::span::{find_span_from, CLOSE, ESCAPE, OPEN};

/// Result of one top-level parse: the expanded text and the diagnostics
/// collected on the way, each shaped `"{opcode}: {message}"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub text: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    /// The pass limit was reached while the text was still changing.
    /// `partial` holds the text as of the last pass, unescaped.
    #[error("input did not converge after {iterations} passes")]
    NonConvergent { iterations: usize, partial: Parsed },
}

impl ParseError {
    pub fn partial(&self) -> &Parsed {
        match self {
            ParseError::NonConvergent { partial, .. } => partial,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    evaluator: Evaluator,
    config: ParserConfig,
    unescape: Unescape,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl Parser {
    /// Parser with the built-in operations.
    pub fn new(config: ParserConfig) -> Self {
        let registry = OperationRegistry::with_builtins(&config);
        Self::with_registry(registry, config)
    }

    pub fn with_registry(registry: OperationRegistry, config: ParserConfig) -> Self {
        Self {
            evaluator: Evaluator::new(registry),
            config,
            unescape: Unescape::new(),
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        self.evaluator.registry()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub async fn parse(&self, input: &str) -> Result<Parsed, ParseError> {
        self.parse_with_args(input, Vec::new()).await
    }

    /// Expands `input` to a fixed point.
    ///
    /// `args` become the positional arguments of a fresh
    /// [`EvaluationContext`] that lives only for this call.
    #[tracing::instrument(skip(self, input, args), level = "debug")]
    pub async fn parse_with_args(
        &self,
        input: &str,
        args: Vec<String>,
    ) -> Result<Parsed, ParseError> {
        let mut context = EvaluationContext::new(args);
        let mut current = input.to_string();
        let mut passes = 0;

        loop {
            if passes == self.config.max_iterations {
                warn!("input did not converge after {} passes", passes);
                return Err(ParseError::NonConvergent {
                    iterations: passes,
                    partial: Parsed {
                        text: self.unescape.process(current.as_str()),
                        errors: context.into_errors(),
                    },
                });
            }

            let next = self.pass(&current, &mut context).await;
            passes += 1;
            if next == current {
                debug!(passes, "converged");
                break;
            }
            debug!(passes, "pass changed text");
            current = next;
        }

        let parsed = Parsed {
            text: self.unescape.process(current.as_str()),
            errors: context.into_errors(),
        };
        info!(passes, errors = parsed.errors.len(), "parse finished");
        Ok(parsed)
    }

    /// One left-to-right sweep over `source`.
    ///
    /// Escapes and brace nesting are judged against the working string, i.e.
    /// the replacements spliced so far followed by the rest of `source`.
    async fn pass(&self, source: &str, context: &mut EvaluationContext) -> String {
        context.begin_pass();
        let mut output = String::with_capacity(source.len());
        let mut cursor = 0;
        let mut scan_from = 0;
        let mut open_pending = false;

        while let Some(span) = find_span_from(source, scan_from) {
            // 差し込んだ結果が `\` で終わるなら直後の `{` はエスケープ扱い
            if span.start == cursor && output.ends_with(ESCAPE as char) {
                scan_from = span.start + 1;
                continue;
            }

            let segment = &source[cursor..span.start];
            open_pending = track_open_brace(open_pending, &output, segment);
            output.push_str(segment);
            let nested = open_pending;

            let expression = Expression::parse(span.inner);
            let replacement = self.evaluator.evaluate(&expression, context).await;
            let changed = replacement != source[span.start..span.end];
            open_pending = track_open_brace(open_pending, &output, &replacement);
            output.push_str(&replacement);
            cursor = span.end;
            scan_from = span.end;

            if nested && changed {
                // 外側の式を後続の式より先に評価するため、次のパスで先頭から走査し直す
                debug!(at = cursor, "enclosing span changed, ending pass");
                break;
            }
        }
        output.push_str(&source[cursor..]);
        output
    }
}

/// Whether an unescaped `{` is still waiting for its `}` after `text` is
/// appended to `before`.
fn track_open_brace(mut pending: bool, before: &str, text: &str) -> bool {
    let mut prev = before.as_bytes().last().copied();
    for &byte in text.as_bytes() {
        match byte {
            OPEN if prev != Some(ESCAPE) => pending = true,
            CLOSE => pending = false,
            _ => {}
        }
        prev = Some(byte);
    }
    pending
}
