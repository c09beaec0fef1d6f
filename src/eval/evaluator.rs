use tracing::{debug, warn};

use crate::operation::registry::OperationRegistry;

use super::{context::EvaluationContext, expression::Expression};

/// Dispatches expression occurrences to registered operations.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    registry: OperationRegistry,
}

impl Evaluator {
    pub fn new(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Evaluates one occurrence and returns its replacement text.
    ///
    /// Unknown opcodes come back unchanged without a diagnostic. A failed
    /// requirement is logged as `"{opcode}: {message}"` (once per occurrence,
    /// see [`EvaluationContext::push_rejection`]) and the occurrence also
    /// comes back unchanged; later requirements are not checked.
    #[tracing::instrument(skip(self, context), level = "debug")]
    pub async fn evaluate(&self, expression: &Expression, context: &mut EvaluationContext) -> String {
        let Some(descriptor) = self.registry.get(&expression.opcode) else {
            debug!("unknown opcode, passing through: {}", expression.opcode);
            return expression.to_source();
        };

        for requirement in descriptor.requirements() {
            if !requirement.is_met(expression, context) {
                warn!(
                    "requirement failed for {}: {}",
                    expression.opcode,
                    requirement.message()
                );
                let source = expression.to_source();
                context.push_rejection(&source, &expression.opcode, requirement.message());
                return source;
            }
        }

        descriptor.operation().execute(expression, context).await
    }
}
