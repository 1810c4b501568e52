//! SQL text generation for MySQL multi-row upserts.
//!
//! Produces statements of the form
//! `INSERT INTO t (a, b) VALUES (?, ?), (?, ?) ON DUPLICATE KEY UPDATE a=VALUES(a), ...`
//! with backtick-quoted identifiers and positional `?` placeholders.

/// Maximum number of placeholders MySQL accepts in one prepared statement.
pub const MYSQL_MAX_PLACEHOLDERS: usize = 65_535;

/// Quotes an identifier with backticks, doubling any embedded backtick.
#[inline]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Formats a table name, handling schema.table format.
pub fn format_table_name(table_name: &str) -> String {
    let parts: Vec<&str> = table_name.split('.').collect();
    if parts.len() == 2 {
        let schema = parts[0].trim_matches('`');
        let table = parts[1].trim_matches('`');
        format!("{}.{}", quote_identifier(schema), quote_identifier(table))
    } else {
        quote_identifier(table_name.trim_matches('`'))
    }
}

/// Builds one value tuple: `(?, ?, ?)`.
pub fn build_values_placeholder(column_count: usize) -> String {
    format!("({})", vec!["?"; column_count].join(", "))
}

/// Builds an ON DUPLICATE KEY UPDATE fragment: `` `col`=VALUES(`col`) ``.
pub fn build_conflict_set_clause(column: &str) -> String {
    let column_name = quote_identifier(column);
    format!("{}=VALUES({})", column_name, column_name)
}

/// Builds the full upsert text for `row_count` rows.
///
/// When `conflict_clauses` is empty the result is a plain multi-row INSERT, so a key
/// collision surfaces as a database error.
pub fn build_upsert_body(
    formatted_table_name: &str,
    columns: &[&str],
    row_count: usize,
    conflict_clauses: &[String],
) -> String {
    let formatted_columns =
        columns.iter().map(|col| quote_identifier(col)).collect::<Vec<_>>().join(", ");

    let tuple = build_values_placeholder(columns.len());
    let values = vec![tuple.as_str(); row_count].join(", ");

    let mut query =
        format!("INSERT INTO {} ({}) VALUES {}", formatted_table_name, formatted_columns, values);

    if !conflict_clauses.is_empty() {
        query.push_str(" ON DUPLICATE KEY UPDATE ");
        query.push_str(&conflict_clauses.join(", "));
    }

    query
}

/// Largest chunk size whose statement stays under [`MYSQL_MAX_PLACEHOLDERS`].
pub fn max_chunk_size_for(column_count: usize) -> usize {
    if column_count == 0 {
        return MYSQL_MAX_PLACEHOLDERS;
    }
    MYSQL_MAX_PLACEHOLDERS / column_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("name"), "`name`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_format_table_name() {
        assert_eq!(format_table_name("users"), "`users`");
        assert_eq!(format_table_name("app.users"), "`app`.`users`");
        assert_eq!(format_table_name("`app`.`users`"), "`app`.`users`");
    }

    #[test]
    fn test_build_upsert_body_with_conflict_clause() {
        let sql = build_upsert_body(
            "`users`",
            &["id", "name"],
            2,
            &[build_conflict_set_clause("name")],
        );

        assert_eq!(
            sql,
            "INSERT INTO `users` (`id`, `name`) VALUES (?, ?), (?, ?) \
             ON DUPLICATE KEY UPDATE `name`=VALUES(`name`)"
        );
    }

    #[test]
    fn test_build_upsert_body_without_conflict_clause() {
        let sql = build_upsert_body("`users`", &["id"], 3, &[]);
        assert_eq!(sql, "INSERT INTO `users` (`id`) VALUES (?), (?), (?)");
    }

    #[test]
    fn test_max_chunk_size_for() {
        assert_eq!(max_chunk_size_for(1), 65_535);
        assert_eq!(max_chunk_size_for(10), 6_553);
        assert_eq!(max_chunk_size_for(0), 65_535);
    }
}
