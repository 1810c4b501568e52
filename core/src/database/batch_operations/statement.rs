use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    database::{
        batch_operations::{
            column_resolver::ResolvedColumns, query_builder::build_upsert_body, BulkUpsertError,
        },
        sql_type_wrapper::SqlValue,
    },
    helpers::to_column_name,
    manifest::config::BulkUpsertConfig,
    record::{FieldDescriptor, RecordShape, UpsertRecord},
};

/// One value to bind, with the column it lands in.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub column: String,
    pub value: SqlValue,
}

/// Per-record values keyed by logical field name, iterated in sorted order.
pub type AttributeMap = BTreeMap<String, Attribute>;

/// A parameterized statement ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    /// Bound values, record-major then column-minor.
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Rejects records that are not struct shaped.
pub fn validate_shape<R: UpsertRecord + ?Sized>(
    record: &R,
    index: usize,
) -> Result<(), BulkUpsertError> {
    match record.shape() {
        RecordShape::Struct => Ok(()),
        shape => Err(BulkUpsertError::ShapeError { index, shape }),
    }
}

fn is_timestamp_field(field: &FieldDescriptor, timestamp_fields: &[String]) -> bool {
    let normalized = to_column_name(&field.name);
    timestamp_fields.iter().any(|timestamp| to_column_name(timestamp) == normalized)
}

fn resolve_value(field: FieldDescriptor, timestamp_fields: &[String]) -> SqlValue {
    if is_timestamp_field(&field, timestamp_fields) {
        return SqlValue::DateTime(Utc::now());
    }

    if field.has_default_value && field.is_blank {
        return field.default_value.unwrap_or(field.value);
    }

    field.value
}

/// Materializes the values one record contributes.
///
/// Timestamp fields always get the current time. Blank fields with a declared default get
/// the default literal, or their own zero value when no literal is known.
pub fn extract_attributes<R: UpsertRecord + ?Sized>(
    record: &R,
    config: &BulkUpsertConfig,
) -> AttributeMap {
    record
        .fields()
        .into_iter()
        .filter(|field| field.is_value_candidate(&config.exclude_columns))
        .map(|field| {
            let name = field.name.clone();
            let column = field.column.clone();
            let value = resolve_value(field, &config.timestamp_fields);
            (name, Attribute { column, value })
        })
        .collect()
}

fn check_consistency(
    attributes: &AttributeMap,
    resolved: &ResolvedColumns,
    index: usize,
) -> Result<(), BulkUpsertError> {
    let consistent = attributes.len() == resolved.columns.len()
        && attributes
            .iter()
            .zip(&resolved.columns)
            .all(|((field, attribute), expected)| {
                field == &expected.field && attribute.column == expected.column
            });

    if consistent {
        Ok(())
    } else {
        Err(BulkUpsertError::InconsistentShapeError {
            index,
            expected: resolved.field_names().into_iter().map(String::from).collect(),
            found: attributes.keys().cloned().collect(),
        })
    }
}

/// Builds the statement for one chunk, or `None` for an empty chunk.
///
/// Every record must resolve to exactly the batch's columns; otherwise the chunk fails before
/// any SQL is produced. `offset` is the batch position of the chunk's first record and is
/// added to the record index reported in errors.
pub fn build_statement<R: UpsertRecord>(
    chunk: &[R],
    offset: usize,
    resolved: &ResolvedColumns,
    config: &BulkUpsertConfig,
) -> Result<Option<Statement>, BulkUpsertError> {
    if chunk.is_empty() {
        return Ok(None);
    }

    let mut params = Vec::with_capacity(chunk.len() * resolved.columns.len());

    for (index, record) in chunk.iter().enumerate() {
        let index = offset + index;
        validate_shape(record, index)?;

        let attributes = extract_attributes(record, config);
        check_consistency(&attributes, resolved, index)?;

        params.extend(attributes.into_values().map(|attribute| attribute.value));
    }

    let sql = build_upsert_body(
        &resolved.table,
        &resolved.column_names(),
        chunk.len(),
        &resolved.conflict_clauses,
    );

    Ok(Some(Statement { sql, params }))
}
