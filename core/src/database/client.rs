use async_trait::async_trait;

use crate::database::sql_type_wrapper::SqlValue;

/// Error reported by the underlying driver, kept as-is.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct ExecutionError(#[source] pub DriverError);

/// Executes parameterized SQL against a MySQL compatible connection.
///
/// Placeholders are positional `?` markers and `params` are bound in order. Implementations
/// return the number of affected rows as reported by the driver.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DriverError>;
}
