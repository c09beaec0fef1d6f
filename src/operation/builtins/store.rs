use async_trait::async_trait;

use crate::eval::{context::EvaluationContext, expression::Expression};
use crate::operation::types::{Operation, Requirement};

use super::Builtin;

pub const MISSING_KEY_OR_VALUE: &str = "both a key and a value are required";

/// `{get:name}` → the value stored under `name`, or nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOperation;

#[async_trait]
impl Operation for GetOperation {
    fn name(&self) -> &str {
        Builtin::Get.opcode()
    }

    async fn execute(&self, expression: &Expression, context: &mut EvaluationContext) -> String {
        context
            .get_value(expression.operand(0))
            .unwrap_or_default()
            .to_string()
    }
}

/// `{set:name|value}` stores `value` and expands to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOperation;

#[async_trait]
impl Operation for SetOperation {
    fn name(&self) -> &str {
        Builtin::Set.opcode()
    }

    fn requirements(&self) -> Vec<Requirement> {
        vec![Requirement::new(MISSING_KEY_OR_VALUE, |expr, _| {
            !expr.operand(0).is_empty() && !expr.operand(1).is_empty()
        })]
    }

    async fn execute(&self, expression: &Expression, context: &mut EvaluationContext) -> String {
        context.set_value(expression.operand(0), expression.operand(1));
        String::new()
    }
}
