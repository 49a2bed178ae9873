#![allow(missing_docs)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod pdf;
pub mod store;

pub use config::AppConfig;
pub use pdf::CommandPdfPrinter;
pub use store::{DirImageStore, JsonAnswerStore};
