pub mod question;
pub mod schema;

pub use question::{Question, QuestionKind, SkipLogic};
pub use schema::{QuestionSchema, SchemaError};
