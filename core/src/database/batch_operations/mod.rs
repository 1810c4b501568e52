//! Multi-row MySQL upserts for homogeneous records.
//!
//! Records are split into chunks, the writable columns are resolved once from the first
//! record of the batch, and each chunk becomes a single
//! `INSERT ... VALUES (...), (...) ON DUPLICATE KEY UPDATE ...` statement. Chunks run
//! strictly in order and the first failure stops the batch.

mod bulk_upsert;
mod chunker;
mod column_resolver;
mod query_builder;
mod statement;

pub use bulk_upsert::{bulk_upsert, bulk_upsert_with_config};
pub use chunker::split_records;
pub use column_resolver::{resolve_columns, ResolvedColumn, ResolvedColumns};
pub use query_builder::{
    build_conflict_set_clause, build_upsert_body, build_values_placeholder, format_table_name,
    max_chunk_size_for, quote_identifier, MYSQL_MAX_PLACEHOLDERS,
};
pub use statement::{
    build_statement, extract_attributes, validate_shape, Attribute, AttributeMap, Statement,
};

use crate::{database::client::ExecutionError, record::RecordShape};

#[derive(thiserror::Error, Debug)]
pub enum BulkUpsertError {
    #[error("Chunk size must be a positive integer but got {0}")]
    InvalidChunkSize(usize),

    #[error("Value must be kind of struct but record {index} is a {shape}")]
    ShapeError { index: usize, shape: RecordShape },

    #[error(
        "Attribute sizes are inconsistent: record {index} resolves to {found:?} but the batch writes {expected:?}"
    )]
    InconsistentShapeError { index: usize, expected: Vec<String>, found: Vec<String> },

    #[error("Column {column} is specified twice: fields {fields:?} both map to it")]
    DuplicateColumn { column: String, fields: Vec<String> },

    #[error("{0}")]
    ExecutionError(#[from] ExecutionError),
}
