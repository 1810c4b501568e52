use tracing::{debug, error, info, warn};

use crate::{
    database::{
        batch_operations::{
            chunker::split_records,
            column_resolver::resolve_columns,
            query_builder::{max_chunk_size_for, MYSQL_MAX_PLACEHOLDERS},
            statement::{build_statement, validate_shape},
            BulkUpsertError,
        },
        client::{ExecutionError, SqlExecutor},
    },
    manifest::config::BulkUpsertConfig,
    record::UpsertRecord,
};

/// Upserts `records` with one `INSERT ... ON DUPLICATE KEY UPDATE` per chunk of `chunk_size`.
///
/// `exclude_columns` holds logical field names that are never written. Chunks are executed in
/// order and the first error stops the batch; earlier chunks are not rolled back, wrap the call
/// in a transaction when the whole batch must be atomic.
pub async fn bulk_upsert<E, R>(
    executor: &E,
    records: &[R],
    chunk_size: usize,
    exclude_columns: &[&str],
) -> Result<(), BulkUpsertError>
where
    E: SqlExecutor + ?Sized,
    R: UpsertRecord,
{
    let config =
        BulkUpsertConfig::new(chunk_size).with_exclude_columns(exclude_columns.iter().copied());
    bulk_upsert_with_config(executor, records, &config).await
}

pub async fn bulk_upsert_with_config<E, R>(
    executor: &E,
    records: &[R],
    config: &BulkUpsertConfig,
) -> Result<(), BulkUpsertError>
where
    E: SqlExecutor + ?Sized,
    R: UpsertRecord,
{
    let chunks = split_records(records, config.chunk_size)?;

    let Some(sample) = records.first() else {
        return Ok(());
    };

    for (index, record) in records.iter().enumerate() {
        validate_shape(record, index)?;
    }

    // The column layout is fixed for the whole batch by its first record.
    let resolved = resolve_columns(sample, &config.exclude_columns).map_err(|e| {
        error!("{} - Could not resolve columns: {}", sample.table_name(), e);
        e
    })?;

    let max_chunk_size = max_chunk_size_for(resolved.columns.len());
    if config.chunk_size.min(records.len()) > max_chunk_size {
        warn!(
            "{} - chunk size {} with {} columns exceeds the {} placeholder limit, use at most {}",
            resolved.table,
            config.chunk_size,
            resolved.columns.len(),
            MYSQL_MAX_PLACEHOLDERS,
            max_chunk_size
        );
    }

    let mut statements = 0;
    let mut affected_rows = 0;

    for (chunk_index, chunk) in chunks.enumerate() {
        let offset = chunk_index * config.chunk_size;
        let statement = match build_statement(chunk, offset, &resolved, config) {
            Ok(Some(statement)) => statement,
            Ok(None) => continue,
            Err(e) => {
                error!("{} - Could not build chunk {}: {}", resolved.table, chunk_index, e);
                return Err(e);
            }
        };

        debug!(
            "{} - Upserting chunk {} ({} records, {} params): {}",
            resolved.table,
            chunk_index,
            chunk.len(),
            statement.params.len(),
            statement.sql
        );

        let rows = executor.execute(&statement.sql, &statement.params).await.map_err(|e| {
            error!("MySQL error: {:?}", e);
            error!("Failed query:\n{}", statement.sql);
            ExecutionError(e)
        })?;

        statements += 1;
        affected_rows += rows;
    }

    info!(
        "{} - Upserted {} records in {} statements ({} rows affected)",
        resolved.table,
        records.len(),
        statements,
        affected_rows
    );

    Ok(())
}
