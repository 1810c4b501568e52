use std::collections::BTreeMap;

use crate::{
    database::batch_operations::{
        query_builder::{build_conflict_set_clause, format_table_name},
        BulkUpsertError,
    },
    record::UpsertRecord,
};

/// A writable column: the logical field and the database column it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub field: String,
    pub column: String,
}

/// Column layout shared by every statement of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub table: String,
    /// Writable columns sorted by logical field name.
    pub columns: Vec<ResolvedColumn>,
    /// `col=VALUES(col)` fragments, in provider field order.
    pub conflict_clauses: Vec<String>,
}

impl ResolvedColumns {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column.as_str()).collect()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.field.as_str()).collect()
    }
}

/// Derives the column layout from a sample record.
///
/// Every value candidate becomes a column, keys included. The conflict clause rewrites
/// only the non-key candidates. Two writable fields mapping to the same column are rejected.
pub fn resolve_columns<R: UpsertRecord + ?Sized>(
    sample: &R,
    exclude_columns: &[String],
) -> Result<ResolvedColumns, BulkUpsertError> {
    let fields = sample.fields();

    let mut columns: Vec<ResolvedColumn> = fields
        .iter()
        .filter(|field| field.is_value_candidate(exclude_columns))
        .map(|field| ResolvedColumn { field: field.name.clone(), column: field.column.clone() })
        .collect();
    columns.sort_by(|a, b| a.field.cmp(&b.field));

    check_duplicate_columns(&columns)?;

    let conflict_clauses = fields
        .iter()
        .filter(|field| field.is_conflict_update_candidate(exclude_columns))
        .map(|field| build_conflict_set_clause(&field.column))
        .collect();

    Ok(ResolvedColumns { table: format_table_name(sample.table_name()), columns, conflict_clauses })
}

fn check_duplicate_columns(columns: &[ResolvedColumn]) -> Result<(), BulkUpsertError> {
    let mut by_column: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for column in columns {
        by_column.entry(column.column.as_str()).or_default().push(column.field.clone());
    }

    match by_column.into_iter().find(|(_, fields)| fields.len() > 1) {
        Some((column, fields)) => {
            Err(BulkUpsertError::DuplicateColumn { column: column.to_string(), fields })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        database::sql_type_wrapper::SqlValue,
        record::{DynamicRecord, FieldDescriptor},
    };

    fn sample() -> DynamicRecord {
        DynamicRecord::new("accounts")
            .with_field(FieldDescriptor::new("id", SqlValue::U64(1)).primary_key())
            .with_field(FieldDescriptor::new("zone", SqlValue::from("eu")))
            .with_field(FieldDescriptor::new("email", SqlValue::from("a@b.c")).unique())
            .with_field(FieldDescriptor::new("balance", SqlValue::I64(5)))
            .with_field(FieldDescriptor::new("handle", SqlValue::from("h")).unique_index())
            .with_field(FieldDescriptor::new("owner_id", SqlValue::U64(2)).foreign_key())
            .with_field(FieldDescriptor::relationship("owner"))
            .with_field(FieldDescriptor::ignored("scratch"))
            .with_field(FieldDescriptor::new("note", SqlValue::from("n")))
    }

    #[test]
    fn test_columns_sorted_by_field_name() {
        let resolved = resolve_columns(&sample(), &[]).unwrap();

        assert_eq!(resolved.table, "`accounts`");
        assert_eq!(
            resolved.field_names(),
            vec!["balance", "email", "handle", "id", "note", "zone"]
        );
    }

    #[test]
    fn test_conflict_clause_skips_keys_and_keeps_provider_order() {
        let resolved = resolve_columns(&sample(), &[]).unwrap();

        assert_eq!(
            resolved.conflict_clauses,
            vec![
                "`zone`=VALUES(`zone`)".to_string(),
                "`balance`=VALUES(`balance`)".to_string(),
                "`note`=VALUES(`note`)".to_string(),
            ]
        );
    }

    #[test]
    fn test_excluded_fields_never_appear() {
        let excluded = vec!["zone".to_string(), "id".to_string()];
        let resolved = resolve_columns(&sample(), &excluded).unwrap();

        assert!(!resolved.field_names().contains(&"zone"));
        assert!(!resolved.field_names().contains(&"id"));
        assert!(resolved.conflict_clauses.iter().all(|c| !c.contains("`zone`")));
    }

    #[test]
    fn test_exclusion_uses_logical_name() {
        let record = DynamicRecord::new("t")
            .with_field(FieldDescriptor::new("nickName", SqlValue::from("x")));

        let by_column = resolve_columns(&record, &["nick_name".to_string()]).unwrap();
        assert_eq!(by_column.columns.len(), 1);

        let by_field = resolve_columns(&record, &["nickName".to_string()]).unwrap();
        assert!(by_field.columns.is_empty());
    }

    #[test]
    fn test_only_keys_gives_no_conflict_clause() {
        let record = DynamicRecord::new("tags")
            .with_field(FieldDescriptor::new("id", SqlValue::U64(1)).primary_key())
            .with_field(FieldDescriptor::new("slug", SqlValue::from("s")).unique());

        let resolved = resolve_columns(&record, &[]).unwrap();
        assert_eq!(resolved.columns.len(), 2);
        assert!(resolved.conflict_clauses.is_empty());
    }

    #[test]
    fn test_two_fields_on_one_column_are_rejected() {
        let record = DynamicRecord::new("t")
            .with_field(FieldDescriptor::new("userName", SqlValue::from("a")))
            .with_field(FieldDescriptor::new("user_name", SqlValue::from("b")))
            .with_field(FieldDescriptor::new("id", SqlValue::U64(1)).primary_key());

        match resolve_columns(&record, &[]).unwrap_err() {
            BulkUpsertError::DuplicateColumn { column, fields } => {
                assert_eq!(column, "user_name");
                assert_eq!(fields, vec!["userName".to_string(), "user_name".to_string()]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_excluding_one_of_two_fields_on_one_column() {
        let record = DynamicRecord::new("t")
            .with_field(FieldDescriptor::new("userName", SqlValue::from("a")))
            .with_field(FieldDescriptor::new("user_name", SqlValue::from("b")));

        let resolved = resolve_columns(&record, &["userName".to_string()]).unwrap();
        assert_eq!(resolved.column_names(), vec!["user_name"]);
        assert_eq!(resolved.conflict_clauses, vec!["`user_name`=VALUES(`user_name`)".to_string()]);
    }
}
