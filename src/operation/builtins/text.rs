use async_trait::async_trait;
use tracing::warn;

use crate::eval::{context::EvaluationContext, expression::Expression};
use crate::operation::types::{Operation, Requirement};

use super::{math::is_integer, Builtin};

pub const INVALID_COUNT: &str = "repeat count is not a valid number";

/// `{note:anything}` expands to nothing. Useful for comments in templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteOperation;

#[async_trait]
impl Operation for NoteOperation {
    fn name(&self) -> &str {
        Builtin::Note.opcode()
    }

    async fn execute(&self, _: &Expression, _: &mut EvaluationContext) -> String {
        String::new()
    }
}

/// `{repeat:ab|3}` → `ababab`
#[derive(Debug, Clone, Copy)]
pub struct RepeatOperation {
    max_count: usize,
    max_bytes: usize,
}

impl RepeatOperation {
    pub fn new(max_count: usize, max_bytes: usize) -> Self {
        Self {
            max_count,
            max_bytes,
        }
    }
}

#[async_trait]
impl Operation for RepeatOperation {
    fn name(&self) -> &str {
        Builtin::Repeat.opcode()
    }

    fn requirements(&self) -> Vec<Requirement> {
        vec![Requirement::new(INVALID_COUNT, |expr, _| {
            is_integer(expr.operand(1))
        })]
    }

    async fn execute(&self, expression: &Expression, context: &mut EvaluationContext) -> String {
        let count = match expression.operand(1).trim().parse::<i64>() {
            Ok(count) => count,
            Err(e) => {
                context.push_error(self.name(), e);
                return String::new();
            }
        };
        let count = match usize::try_from(count) {
            Ok(count) => count,
            Err(_) => {
                context.push_error(self.name(), format!("count must not be negative: {}", count));
                return String::new();
            }
        };
        if count > self.max_count {
            warn!(count, max = self.max_count, "repeat count over limit");
            context.push_error(
                self.name(),
                format!("count {} exceeds the limit of {}", count, self.max_count),
            );
            return String::new();
        }

        // ネストした repeat はカウント上限内でも出力が膨らむ
        let unit = expression.operand(0);
        match unit.len().checked_mul(count) {
            Some(size) if size <= self.max_bytes => unit.repeat(count),
            _ => {
                warn!(count, unit = unit.len(), max = self.max_bytes, "repeat output over limit");
                context.push_error(
                    self.name(),
                    format!("output would exceed {} bytes", self.max_bytes),
                );
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repeat(max: usize, inner: &str) -> (String, Vec<String>) {
        repeat_within(max, 1024, inner).await
    }

    async fn repeat_within(max: usize, max_bytes: usize, inner: &str) -> (String, Vec<String>) {
        let mut ctx = EvaluationContext::default();
        let result = RepeatOperation::new(max, max_bytes)
            .execute(&Expression::parse(inner), &mut ctx)
            .await;
        (result, ctx.into_errors())
    }

    #[tokio::test]
    async fn test_note() {
        let mut ctx = EvaluationContext::default();
        let result = NoteOperation
            .execute(&Expression::parse("note:remember {this}"), &mut ctx)
            .await;
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn test_repeat() {
        assert_eq!(repeat(10, "repeat:ab|3").await, ("ababab".to_string(), vec![]));
        assert_eq!(repeat(10, "repeat:ab|0").await, (String::new(), vec![]));
    }

    #[tokio::test]
    async fn test_repeat_negative() {
        let (result, errors) = repeat(10, "repeat:ab|-1").await;
        assert_eq!(result, "");
        assert_eq!(errors, vec!["repeat: count must not be negative: -1"]);
    }

    #[tokio::test]
    async fn test_repeat_over_limit() {
        let (result, errors) = repeat(2, "repeat:ab|3").await;
        assert_eq!(result, "");
        assert_eq!(errors, vec!["repeat: count 3 exceeds the limit of 2"]);
    }

    #[tokio::test]
    async fn test_repeat_output_limit() {
        assert_eq!(
            repeat_within(100, 6, "repeat:ab|3").await,
            ("ababab".to_string(), vec![])
        );

        let (result, errors) = repeat_within(100, 6, "repeat:ab|4").await;
        assert_eq!(result, "");
        assert_eq!(errors, vec!["repeat: output would exceed 6 bytes"]);

        // the count alone is within its limit, the product is not
        let unit = "x".repeat(100_000);
        let (result, errors) =
            repeat_within(100_000, 4 * 1024 * 1024, &format!("repeat:{}|100000", unit)).await;
        assert_eq!(result, "");
        assert_eq!(errors, vec!["repeat: output would exceed 4194304 bytes"]);
    }

    #[test]
    fn test_repeat_requirement() {
        let ctx = EvaluationContext::default();
        let requirement = &RepeatOperation::new(10, 1024).requirements()[0];
        assert!(requirement.is_met(&Expression::parse("repeat:x|2"), &ctx));
        assert!(!requirement.is_met(&Expression::parse("repeat:x|two"), &ctx));
        assert!(!requirement.is_met(&Expression::parse("repeat:x"), &ctx));
    }
}
