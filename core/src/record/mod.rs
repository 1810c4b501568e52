//! Field metadata for records written by the bulk upsert engine.
//!
//! A record type describes itself through [`UpsertRecord`]: its table, its shape and an
//! ordered list of [`FieldDescriptor`]s carrying both column metadata and the current value.
//! Types are usually registered with the [`upsert_record!`](crate::upsert_record) macro;
//! [`DynamicRecord`] covers records whose fields are only known at runtime.

mod dynamic;
mod field;
mod macros;

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

pub use dynamic::DynamicRecord;
pub use field::FieldDescriptor;

use crate::database::sql_type_wrapper::SqlValue;

/// Kind of value a record is. Only [`RecordShape::Struct`] can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    Struct,
    Map,
    Sequence,
    Primitive,
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordShape::Struct => write!(f, "struct"),
            RecordShape::Map => write!(f, "map"),
            RecordShape::Sequence => write!(f, "sequence"),
            RecordShape::Primitive => write!(f, "primitive"),
        }
    }
}

/// Metadata provider for one record.
///
/// `fields` must return the same descriptors, in the same order, for every record of a type.
pub trait UpsertRecord {
    fn table_name(&self) -> &str;

    fn shape(&self) -> RecordShape {
        RecordShape::Struct
    }

    fn fields(&self) -> Vec<FieldDescriptor>;
}

impl<T: UpsertRecord + ?Sized> UpsertRecord for &T {
    fn table_name(&self) -> &str {
        (**self).table_name()
    }

    fn shape(&self) -> RecordShape {
        (**self).shape()
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        (**self).fields()
    }
}

impl<T: UpsertRecord + ?Sized> UpsertRecord for Box<T> {
    fn table_name(&self) -> &str {
        (**self).table_name()
    }

    fn shape(&self) -> RecordShape {
        (**self).shape()
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        (**self).fields()
    }
}

// Plain maps carry no column metadata, so they are reported as maps and rejected.
impl UpsertRecord for BTreeMap<String, SqlValue> {
    fn table_name(&self) -> &str {
        ""
    }

    fn shape(&self) -> RecordShape {
        RecordShape::Map
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        Vec::new()
    }
}

impl UpsertRecord for HashMap<String, SqlValue> {
    fn table_name(&self) -> &str {
        ""
    }

    fn shape(&self) -> RecordShape {
        RecordShape::Map
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        Vec::new()
    }
}
