//! Operations available in every default registry.
//!
//! | opcode   | result                                          |
//! |----------|-------------------------------------------------|
//! | `add`    | sum of the integer operands                     |
//! | `e`      | Euler's number                                  |
//! | `pi`     | π                                               |
//! | `get`    | stored value of operand 0, or empty             |
//! | `set`    | stores operand 1 under operand 0, yields empty  |
//! | `note`   | nothing; an author comment                      |
//! | `repeat` | operand 0 repeated operand 1 times              |
//! | `text`   | body of an HTTP GET to operand 0                |

pub mod fetch;
pub mod math;
pub mod store;
pub mod text;

use std::sync::Arc;

use crate::config::ParserConfig;

use super::types::Operation;

pub use fetch::{FetchError, Fetcher, HttpFetcher, MockFetcher, TextOperation};
pub use math::{AddOperation, ConstantOperation};
pub use store::{GetOperation, SetOperation};
pub use text::{NoteOperation, RepeatOperation};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Add,
    E,
    Pi,
    Get,
    Set,
    Note,
    Repeat,
    Text,
}

impl Builtin {
    pub fn opcode(self) -> &'static str {
        self.into()
    }

    // factory method for built-in operations.
    pub fn create(&self, config: &ParserConfig) -> Arc<dyn Operation> {
        match self {
            Builtin::Add => Arc::new(AddOperation),
            Builtin::E => Arc::new(ConstantOperation::e()),
            Builtin::Pi => Arc::new(ConstantOperation::pi()),
            Builtin::Get => Arc::new(GetOperation),
            Builtin::Set => Arc::new(SetOperation),
            Builtin::Note => Arc::new(NoteOperation),
            Builtin::Repeat => Arc::new(RepeatOperation::new(
                config.max_repeat,
                config.max_repeat_bytes,
            )),
            Builtin::Text => Arc::new(TextOperation::new(HttpFetcher::new(config))),
        }
    }
}
