use std::{collections::BTreeMap, fmt, sync::Arc};

use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

use crate::config::ParserConfig;
use crate::eval::expression::{DIVIDER, SEPARATOR};

use super::builtins::Builtin;
use super::types::{Operation, Requirement};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("opcode already registered: {0}")]
    DuplicateOpcode(String),
    #[error("invalid opcode name: {0:?}")]
    InvalidOpcode(String),
}

/// A registered operation together with its requirements, collected once.
#[derive(Clone)]
pub struct Descriptor {
    operation: Arc<dyn Operation>,
    requirements: Vec<Requirement>,
}

impl Descriptor {
    fn new(operation: Arc<dyn Operation>) -> Self {
        let requirements = operation.requirements();
        Self {
            operation,
            requirements,
        }
    }

    pub fn operation(&self) -> &dyn Operation {
        self.operation.as_ref()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.operation.name())
            .field("requirements", &self.requirements)
            .finish()
    }
}

/// Immutable opcode lookup table shared by every parse.
///
/// Cloning is cheap; all clones point at the same table.
#[derive(Clone, Default, Debug)]
pub struct OperationRegistry {
    operations: Arc<BTreeMap<String, Descriptor>>,
}

impl OperationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding only the built-in operations.
    pub fn with_builtins(config: &ParserConfig) -> Self {
        RegistryBuilder::with_builtins(config).build()
    }

    pub fn get(&self, opcode: &str) -> Option<&Descriptor> {
        self.operations.get(opcode)
    }

    pub fn contains(&self, opcode: &str) -> bool {
        self.operations.contains_key(opcode)
    }

    /// Registered opcodes in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Collects operations at startup, then freezes them into an [`OperationRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    operations: BTreeMap<String, Descriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins(config: &ParserConfig) -> Self {
        let mut operations = BTreeMap::new();
        for builtin in Builtin::iter() {
            operations.insert(
                builtin.to_string(),
                Descriptor::new(builtin.create(config)),
            );
        }
        Self { operations }
    }

    pub fn register(&mut self, operation: Arc<dyn Operation>) -> Result<(), RegistryError> {
        let name = operation.name().to_string();
        if !is_valid_opcode(&name) {
            return Err(RegistryError::InvalidOpcode(name));
        }
        if self.operations.contains_key(&name) {
            return Err(RegistryError::DuplicateOpcode(name));
        }
        debug!("register operation: {}", name);
        self.operations.insert(name, Descriptor::new(operation));
        Ok(())
    }

    pub fn build(self) -> OperationRegistry {
        OperationRegistry {
            operations: Arc::new(self.operations),
        }
    }
}

// `{` `}` `:` `|` を含む名前は式として書けない
fn is_valid_opcode(name: &str) -> bool {
    !name.is_empty() && !name.contains(['{', '}', DIVIDER, SEPARATOR])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{context::EvaluationContext, expression::Expression};
    use async_trait::async_trait;

    struct Shout;

    #[async_trait]
    impl Operation for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        async fn execute(&self, expression: &Expression, _: &mut EvaluationContext) -> String {
            expression.operand(0).to_uppercase()
        }
    }

    struct Named(&'static str);

    #[async_trait]
    impl Operation for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn execute(&self, _: &Expression, _: &mut EvaluationContext) -> String {
            String::new()
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = OperationRegistry::with_builtins(&ParserConfig::default());
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["add", "e", "get", "note", "pi", "repeat", "set", "text"]
        );
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.get("add").unwrap().requirements().len(), 1);
        assert!(registry.get("pi").unwrap().requirements().is_empty());
    }

    #[test]
    fn test_opcodes_are_case_sensitive() {
        let registry = OperationRegistry::with_builtins(&ParserConfig::default());
        assert!(registry.contains("pi"));
        assert!(!registry.contains("PI"));
    }

    #[test]
    fn test_register_custom_operation() {
        let mut builder = RegistryBuilder::with_builtins(&ParserConfig::default());
        builder.register(Arc::new(Shout)).unwrap();
        let registry = builder.build();
        assert!(registry.contains("shout"));
        assert_eq!(registry.get("shout").unwrap().operation().name(), "shout");
    }

    #[test]
    fn test_register_duplicate_operation() {
        let mut builder = RegistryBuilder::new();
        builder.register(Arc::new(Shout)).unwrap();

        // 重複して登録しようとするとエラーになる
        let result = builder.register(Arc::new(Shout));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateOpcode("shout".to_string()))
        );

        let mut builder = RegistryBuilder::with_builtins(&ParserConfig::default());
        let result = builder.register(Arc::new(Named("add")));
        assert!(matches!(result, Err(RegistryError::DuplicateOpcode(_))));
    }

    #[test]
    fn test_register_invalid_name() {
        let mut builder = RegistryBuilder::new();
        for name in ["", "a:b", "a|b", "{a", "a}"] {
            let result = builder.register(Arc::new(Named(name)));
            assert_eq!(result, Err(RegistryError::InvalidOpcode(name.to_string())));
        }
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_clones_share_table() {
        let registry = OperationRegistry::with_builtins(&ParserConfig::default());
        let clone = registry.clone();
        assert!(Arc::ptr_eq(&registry.operations, &clone.operations));
    }
}
