use std::collections::HashMap;

use tracing::debug;

/// 実行コンテキスト
///
/// Per-parse state threaded through the evaluator and every executor.
/// A fresh context is created for each top-level parse and dropped when it
/// returns, so nothing leaks between calls.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    args: Vec<String>,
    values: HashMap<String, String>,
    errors: Vec<String>,
    // 前のパスまでに報告済みの要件違反 (span, message) → 出現数
    reported: HashMap<(String, String), usize>,
    current: HashMap<(String, String), usize>,
}

impl EvaluationContext {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            ..Default::default()
        }
    }

    /// Positional argument at `index`, if supplied by the caller.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 変数の読み取り
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// 変数の更新
    pub fn set_value<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        debug!(name = %name, "value stored");
        self.values.insert(name, value.into());
    }

    /// Appends `"{opcode}: {message}"` to the error log.
    pub fn push_error(&mut self, opcode: &str, message: impl std::fmt::Display) {
        self.errors.push(format!("{}: {}", opcode, message));
    }

    /// Logs a failed requirement for the occurrence written as `source`.
    ///
    /// A rejected occurrence stays in the text and is checked again on every
    /// later pass. It is logged only when this pass holds more identical
    /// rejections than any earlier pass did.
    pub fn push_rejection(&mut self, source: &str, opcode: &str, message: &str) {
        let key = (source.to_string(), message.to_string());
        let seen = self.current.entry(key.clone()).or_insert(0);
        *seen += 1;
        if *seen > self.reported.get(&key).copied().unwrap_or(0) {
            self.push_error(opcode, message);
        }
    }

    /// Marks the start of a new driver pass.
    pub(crate) fn begin_pass(&mut self) {
        for (key, count) in self.current.drain() {
            let reported = self.reported.entry(key).or_insert(0);
            *reported = (*reported).max(count);
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}
