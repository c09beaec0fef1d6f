use async_trait::async_trait;

use crate::eval::{context::EvaluationContext, expression::Expression};
use crate::operation::types::{Operation, Requirement};

use super::Builtin;

pub const INVALID_NUMBERS: &str = "not all input operands are valid numbers";

/// `{add:1|2|3}` → `6`
///
/// Operands are validated as integers but summed as floats, so `{add:1.5|2}`
/// is rejected even though the sum itself would work. The integer check is
/// bounded by `i64`: `{add:99999999999999999999|1}` is rejected as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOperation;

pub(crate) fn is_integer(operand: &str) -> bool {
    operand.trim().parse::<i64>().is_ok()
}

#[async_trait]
impl Operation for AddOperation {
    fn name(&self) -> &str {
        Builtin::Add.opcode()
    }

    fn requirements(&self) -> Vec<Requirement> {
        vec![Requirement::new(INVALID_NUMBERS, |expr, _| {
            expr.operands.iter().all(|operand| is_integer(operand))
        })]
    }

    async fn execute(&self, expression: &Expression, context: &mut EvaluationContext) -> String {
        let mut sum = 0.0_f64;
        for operand in &expression.operands {
            match operand.trim().parse::<f64>() {
                Ok(value) => sum += value,
                Err(e) => {
                    context.push_error(self.name(), e);
                    return String::new();
                }
            }
        }
        sum.to_string()
    }
}

/// A nullary operation yielding a fixed number, `{pi}` and `{e}`.
#[derive(Debug, Clone, Copy)]
pub struct ConstantOperation {
    builtin: Builtin,
    value: f64,
}

impl ConstantOperation {
    pub fn e() -> Self {
        Self {
            builtin: Builtin::E,
            value: std::f64::consts::E,
        }
    }

    pub fn pi() -> Self {
        Self {
            builtin: Builtin::Pi,
            value: std::f64::consts::PI,
        }
    }
}

#[async_trait]
impl Operation for ConstantOperation {
    fn name(&self) -> &str {
        self.builtin.opcode()
    }

    async fn execute(&self, _: &Expression, _: &mut EvaluationContext) -> String {
        self.value.to_string()
    }
}
