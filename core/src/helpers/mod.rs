use std::{env, env::VarError};

use dotenv::dotenv;

fn camel_to_snake_advanced(s: &str, numbers_attach_to_last_word: bool) -> String {
    let mut snake_case = String::new();
    let mut previous_was_uppercase = false;
    let mut previous_was_digit = false;
    let mut uppercase_sequence_length = 0;
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().copied().enumerate() {
        if c.is_alphanumeric() || c == '_' {
            if c.is_uppercase() {
                if i > 0
                    && !snake_case.ends_with('_')
                    && (!previous_was_uppercase
                        || chars.get(i + 1).is_some_and(|next| next.is_lowercase()))
                {
                    snake_case.push('_');
                }
                snake_case.push(c.to_ascii_lowercase());
                previous_was_uppercase = true;
                previous_was_digit = false;
                uppercase_sequence_length += 1;
            } else if c.is_ascii_digit() {
                if !numbers_attach_to_last_word
                    && i > 0
                    && !previous_was_digit
                    && !snake_case.ends_with('_')
                    && uppercase_sequence_length != 1
                {
                    snake_case.push('_');
                }
                snake_case.push(c);
                previous_was_uppercase = false;
                previous_was_digit = true;
                uppercase_sequence_length = 0;
            } else {
                snake_case.push(c);
                previous_was_uppercase = false;
                previous_was_digit = false;
                uppercase_sequence_length = 0;
            }
        }
    }

    snake_case
}

/// Database column name for a logical field name, `CreatedAt` -> `created_at`.
pub fn to_column_name(field_name: &str) -> String {
    camel_to_snake_advanced(field_name, true)
}

pub fn public_read_env_value(var_name: &str) -> Result<String, VarError> {
    dotenv().ok();
    env::var(var_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_snake_advanced() {
        let camel_to_snake = |s: &str| camel_to_snake_advanced(s, false);
        assert_eq!(camel_to_snake("CamelCase"), "camel_case");
        assert_eq!(camel_to_snake("Camel-Case"), "camel_case");
        assert_eq!(camel_to_snake("camelCase"), "camel_case");
        assert_eq!(camel_to_snake("camel_case"), "camel_case");
        assert_eq!(camel_to_snake("Camel"), "camel");
        assert_eq!(camel_to_snake("UserID"), "user_id");
        assert_eq!(camel_to_snake("arg1"), "arg_1");
        assert_eq!(camel_to_snake_advanced("arg1", true), "arg1");
    }

    #[test]
    fn test_to_column_name() {
        assert_eq!(to_column_name("CreatedAt"), "created_at");
        assert_eq!(to_column_name("updatedAt"), "updated_at");
        assert_eq!(to_column_name("created_at"), "created_at");
        assert_eq!(to_column_name("address2"), "address2");
        assert_eq!(to_column_name("HTTPStatus"), "http_status");
    }
}
