/// Registers a struct as an upsert record.
///
/// Fields are listed in the order the provider should report them, each with an optional
/// bracketed list of flags. Fields without `relationship` or `ignore` must implement
/// [`ToSqlValue`](crate::ToSqlValue).
///
/// # Example
///
/// ```ignore
/// struct User {
///     id: u64,
///     email: String,
///     nickname: String,
///     team_id: u64,
///     team: Option<Team>,
///     created_at: DateTime<Utc>,
/// }
///
/// upsert_record! {
///     User => "users" {
///         id: [primary_key],
///         email: [unique_index],
///         nickname: [default = "anonymous"],
///         team_id: [foreign_key],
///         team: [relationship],
///         created_at,
///     }
/// }
/// ```
///
/// Supported flags: `primary_key`, `unique`, `unique_index`, `foreign_key`, `default`,
/// `default = <expr>`, `column = "<name>"`, `relationship` and `ignore`.
#[macro_export]
macro_rules! upsert_record {
    (
        $record:ty => $table:literal {
            $( $field:ident $( : [ $($flag:tt)* ] )? ),* $(,)?
        }
    ) => {
        impl $crate::record::UpsertRecord for $record {
            fn table_name(&self) -> &str {
                $table
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::record::FieldDescriptor> {
                ::std::vec![
                    $( $crate::__upsert_field!(self, $field, [ $( $($flag)* )? ]) ),*
                ]
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __upsert_field {
    ($this:ident, $field:ident, [relationship $($rest:tt)*]) => {
        $crate::record::FieldDescriptor::relationship(stringify!($field))
    };
    ($this:ident, $field:ident, [ignore $($rest:tt)*]) => {
        $crate::record::FieldDescriptor::ignored(stringify!($field))
    };
    ($this:ident, $field:ident, [$($flag:tt)*]) => {
        $crate::__upsert_flags!(
            $crate::record::FieldDescriptor::from_value(stringify!($field), &$this.$field);
            $($flag)*
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __upsert_flags {
    ($descriptor:expr;) => {
        $descriptor
    };
    ($descriptor:expr; primary_key $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.primary_key(); $($($rest)*)?)
    };
    ($descriptor:expr; unique $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.unique(); $($($rest)*)?)
    };
    ($descriptor:expr; unique_index $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.unique_index(); $($($rest)*)?)
    };
    ($descriptor:expr; foreign_key $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.foreign_key(); $($($rest)*)?)
    };
    ($descriptor:expr; default = $literal:expr $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.default_literal($literal); $($($rest)*)?)
    };
    ($descriptor:expr; default $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.default_value(); $($($rest)*)?)
    };
    ($descriptor:expr; column = $column:literal $(, $($rest:tt)*)?) => {
        $crate::__upsert_flags!($descriptor.column($column); $($($rest)*)?)
    };
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use crate::{
        database::sql_type_wrapper::SqlValue,
        record::{RecordShape, UpsertRecord},
    };

    #[allow(dead_code)]
    struct Team {
        name: String,
    }

    #[allow(dead_code)]
    struct Player {
        id: u64,
        email: String,
        nickname: String,
        level: i32,
        team_id: Option<u64>,
        team: Option<Team>,
        score_cache: Vec<Team>,
        created_at: DateTime<Utc>,
    }

    crate::upsert_record! {
        Player => "players" {
            id: [primary_key],
            email: [unique_index, column = "email_address"],
            nickname: [default = "anonymous"],
            level: [default],
            team_id: [foreign_key],
            team: [relationship],
            score_cache: [ignore],
            created_at,
        }
    }

    fn player() -> Player {
        Player {
            id: 7,
            email: "p@example.com".to_string(),
            nickname: String::new(),
            level: 0,
            team_id: Some(2),
            team: None,
            score_cache: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_macro_reports_fields_in_declaration_order() {
        let record = player();

        assert_eq!(record.table_name(), "players");
        assert_eq!(record.shape(), RecordShape::Struct);

        let names: Vec<String> = record.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "email",
                "nickname",
                "level",
                "team_id",
                "team",
                "score_cache",
                "created_at"
            ]
        );
    }

    #[test]
    fn test_macro_flags() {
        let fields = player().fields();

        assert!(fields[0].is_primary_key);
        assert_eq!(fields[0].value, SqlValue::U64(7));

        assert!(fields[1].is_unique_index);
        assert_eq!(fields[1].column, "email_address");

        assert!(fields[2].has_default_value);
        assert!(fields[2].is_blank);
        assert_eq!(fields[2].default_value, Some(SqlValue::String("anonymous".to_string())));

        assert!(fields[3].has_default_value);
        assert_eq!(fields[3].default_value, None);

        assert!(fields[4].has_foreign_key);
        assert!(fields[5].is_relationship);
        assert!(fields[6].is_ignored);
        assert!(!fields[7].is_blank);
    }
}
