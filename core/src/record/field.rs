use crate::{
    database::sql_type_wrapper::{SqlValue, ToSqlValue},
    helpers::to_column_name,
};

/// Metadata and current value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Logical field name as declared on the record type.
    pub name: String,
    /// Database column the field maps to.
    pub column: String,
    pub is_primary_key: bool,
    /// Field is a to-one or to-many association rather than a column.
    pub is_relationship: bool,
    pub has_foreign_key: bool,
    pub is_ignored: bool,
    pub is_unique: bool,
    pub is_unique_index: bool,
    pub has_default_value: bool,
    /// Field holds the zero value of its type.
    pub is_blank: bool,
    pub default_value: Option<SqlValue>,
    pub value: SqlValue,
}

impl FieldDescriptor {
    /// Creates a column field. The column name is derived from the logical name.
    pub fn new(name: impl Into<String>, value: SqlValue) -> Self {
        let name = name.into();
        let is_blank = value.is_blank();
        FieldDescriptor {
            column: to_column_name(&name),
            name,
            is_primary_key: false,
            is_relationship: false,
            has_foreign_key: false,
            is_ignored: false,
            is_unique: false,
            is_unique_index: false,
            has_default_value: false,
            is_blank,
            default_value: None,
            value,
        }
    }

    /// Creates a column field from a typed value, using the type's own notion of blank.
    pub fn from_value<T: ToSqlValue + ?Sized>(name: impl Into<String>, value: &T) -> Self {
        let mut field = FieldDescriptor::new(name, value.to_sql_value());
        field.is_blank = value.is_blank();
        field
    }

    /// Creates an association field. It never maps to a column.
    pub fn relationship(name: impl Into<String>) -> Self {
        let mut field = FieldDescriptor::new(name, SqlValue::Null);
        field.is_relationship = true;
        field
    }

    pub fn ignored(name: impl Into<String>) -> Self {
        let mut field = FieldDescriptor::new(name, SqlValue::Null);
        field.is_ignored = true;
        field
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.has_foreign_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn unique_index(mut self) -> Self {
        self.is_unique_index = true;
        self
    }

    /// Marks the field as having a database default, with no literal known.
    pub fn default_value(mut self) -> Self {
        self.has_default_value = true;
        self
    }

    pub fn default_literal(mut self, literal: impl Into<SqlValue>) -> Self {
        self.has_default_value = true;
        self.default_value = Some(literal.into());
        self
    }

    /// Whether the field's value is written at all.
    pub fn is_value_candidate(&self, exclude_columns: &[String]) -> bool {
        !exclude_columns.iter().any(|excluded| excluded == &self.name)
            && !self.is_relationship
            && !self.has_foreign_key
            && !self.is_ignored
    }

    /// Whether the field is rewritten when the row already exists.
    pub fn is_conflict_update_candidate(&self, exclude_columns: &[String]) -> bool {
        self.is_value_candidate(exclude_columns) && !self.is_conflict_key()
    }

    /// Primary key, unique and unique-index fields detect the conflict itself.
    pub fn is_conflict_key(&self) -> bool {
        self.is_primary_key || self.is_unique || self.is_unique_index
    }
}
