// src/lib.rs

pub mod config;
pub mod error;
pub mod llm;
pub mod records;

pub use error::{CompletionError, ConfigError};
