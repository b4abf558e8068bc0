#![forbid(unsafe_code)]

pub mod csv;
pub mod repository;
pub mod sqlite;

pub use repository::{EvaluationLog, InMemoryEvaluationLog, Storage, StorageError};
