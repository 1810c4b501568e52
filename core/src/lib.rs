//! Batch homogeneous records into multi-row MySQL upserts.
//!
//! ```ignore
//! upsert_record! {
//!     User => "users" {
//!         id: [primary_key],
//!         email: [unique_index],
//!         name,
//!         updated_at,
//!     }
//! }
//!
//! bulk_upsert(&executor, &users, 2000, &["Password"]).await?;
//! ```

mod database;
pub use database::{
    batch_operations::{
        build_conflict_set_clause, build_statement, build_upsert_body, build_values_placeholder,
        bulk_upsert, bulk_upsert_with_config, extract_attributes, format_table_name,
        max_chunk_size_for, quote_identifier, resolve_columns, split_records, validate_shape,
        Attribute, AttributeMap, BulkUpsertError, ResolvedColumn, ResolvedColumns, Statement,
        MYSQL_MAX_PLACEHOLDERS,
    },
    client::{DriverError, ExecutionError, SqlExecutor},
    sql_type_wrapper::{SqlValue, ToSqlValue},
};

pub mod record;
pub use record::{DynamicRecord, FieldDescriptor, RecordShape, UpsertRecord};

mod manifest;
pub use manifest::config::{
    read_config, BulkUpsertConfig, ReadConfigError, CHUNK_SIZE_ENV, EXCLUDE_COLUMNS_ENV,
};

mod helpers;
pub use helpers::to_column_name;

mod logger;
pub use logger::{setup_info_logger, setup_logger, setup_statement_logger};

// export 3rd party dependencies
pub use async_trait::async_trait;
pub use tracing::level_filters::LevelFilter;
