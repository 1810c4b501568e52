use serde_json::Value;

use crate::{
    database::sql_type_wrapper::SqlValue,
    record::{FieldDescriptor, RecordShape, UpsertRecord},
};

/// A record whose fields are defined at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    table: String,
    shape: RecordShape,
    fields: Vec<FieldDescriptor>,
}

impl DynamicRecord {
    pub fn new(table: impl Into<String>) -> Self {
        DynamicRecord { table: table.into(), shape: RecordShape::Struct, fields: Vec::new() }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push_field(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    /// Builds a record from a JSON document.
    ///
    /// Objects become struct records with one field per key, in key order. Arrays and scalars
    /// keep their shape so the engine can reject them.
    pub fn from_json(table: impl Into<String>, value: &Value) -> Self {
        let mut record = DynamicRecord::new(table);
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    record.push_field(FieldDescriptor::new(key.as_str(), SqlValue::from_json(value)));
                }
            }
            Value::Array(_) => record.shape = RecordShape::Sequence,
            _ => record.shape = RecordShape::Primitive,
        }
        record
    }
}

impl UpsertRecord for DynamicRecord {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn shape(&self) -> RecordShape {
        self.shape
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }
}
