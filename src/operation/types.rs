use std::{borrow::Cow, fmt, sync::Arc};

use async_trait::async_trait;

use crate::eval::{context::EvaluationContext, expression::Expression};

type Check = dyn Fn(&Expression, &EvaluationContext) -> bool + Send + Sync;

/// A pre-execution check guarding an operation's operands.
///
/// The check must be pure; the message is recorded verbatim (prefixed by the
/// opcode) when it fails.
#[derive(Clone)]
pub struct Requirement {
    message: Cow<'static, str>,
    check: Arc<Check>,
}

impl Requirement {
    pub fn new<M, F>(message: M, check: F) -> Self
    where
        M: Into<Cow<'static, str>>,
        F: Fn(&Expression, &EvaluationContext) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            check: Arc::new(check),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_met(&self, expression: &Expression, context: &EvaluationContext) -> bool {
        (self.check)(expression, context)
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A named operation callable as `{name:operands}`.
///
/// Implement this once per opcode and register it with
/// [`crate::operation::registry::RegistryBuilder`]. `execute` only runs after
/// every requirement has passed.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Opcode the operation is registered under. Case-sensitive.
    fn name(&self) -> &str;

    /// Checks run in order before `execute`. Collected once at registration.
    fn requirements(&self) -> Vec<Requirement> {
        Vec::new()
    }

    /// Produces the replacement text for one occurrence.
    ///
    /// This must not fail: anything that goes wrong is reported through
    /// [`EvaluationContext::push_error`] and a fallback string (usually
    /// empty) is returned instead.
    async fn execute(&self, expression: &Expression, context: &mut EvaluationContext) -> String;
}
