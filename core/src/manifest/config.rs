use std::{env, fs::File, io::Read, path::Path};

use dotenv::dotenv;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::helpers::public_read_env_value;

pub const CHUNK_SIZE_ENV: &str = "BULK_UPSERT_CHUNK_SIZE";
pub const EXCLUDE_COLUMNS_ENV: &str = "BULK_UPSERT_EXCLUDE_COLUMNS";

fn default_chunk_size() -> usize {
    2000
}

fn default_timestamp_fields() -> Vec<String> {
    vec!["created_at".to_string(), "updated_at".to_string()]
}

/// Options controlling how a batch is split and which fields are written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BulkUpsertConfig {
    /// Records per statement. Larger chunks mean fewer round trips, but each record adds one
    /// placeholder per column and MySQL rejects statements above 65,535 placeholders.
    /// 2000 to 3000 is a reasonable range for most tables.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Logical field names never written, neither as values nor in the conflict clause.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_columns: Vec<String>,

    /// Field names that always receive the current time. Matched after snake casing, so
    /// `CreatedAt`, `createdAt` and `created_at` are the same field.
    #[serde(default = "default_timestamp_fields")]
    pub timestamp_fields: Vec<String>,
}

impl Default for BulkUpsertConfig {
    fn default() -> Self {
        BulkUpsertConfig {
            chunk_size: default_chunk_size(),
            exclude_columns: Vec::new(),
            timestamp_fields: default_timestamp_fields(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReadConfigError {
    #[error("Could not open file: {0}")]
    CouldNotOpenFile(#[from] std::io::Error),

    #[error("Could not parse config: {0}")]
    CouldNotParseConfig(#[from] serde_yaml::Error),

    #[error("Could not substitute env variables: {0}")]
    CouldNotSubstituteEnvVariables(#[from] regex::Error),

    #[error("Environment variable {0} not found")]
    EnvironmentVariableNotFound(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl BulkUpsertConfig {
    pub fn new(chunk_size: usize) -> Self {
        BulkUpsertConfig { chunk_size, ..BulkUpsertConfig::default() }
    }

    pub fn with_exclude_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ReadConfigError> {
        let config: BulkUpsertConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `BULK_UPSERT_CHUNK_SIZE` and `BULK_UPSERT_EXCLUDE_COLUMNS` when they are set.
    pub fn with_env_overrides(mut self) -> Result<Self, ReadConfigError> {
        if let Ok(chunk_size) = public_read_env_value(CHUNK_SIZE_ENV) {
            self.chunk_size = chunk_size
                .trim()
                .parse()
                .map_err(|_| ReadConfigError::InvalidValue(CHUNK_SIZE_ENV, chunk_size.clone()))?;
        }

        if let Ok(columns) = public_read_env_value(EXCLUDE_COLUMNS_ENV) {
            self.exclude_columns = columns
                .split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(String::from)
                .collect();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ReadConfigError> {
        if self.chunk_size == 0 {
            return Err(ReadConfigError::InvalidValue("chunk_size", self.chunk_size.to_string()));
        }
        Ok(())
    }
}

fn substitute_env_variables(contents: &str) -> Result<String, ReadConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;
    let mut missing = None;

    let result = re.replace_all(contents, |caps: &Captures| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => {
                error!("Environment variable {} not found", var_name);
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var_name) => Err(ReadConfigError::EnvironmentVariableNotFound(var_name)),
        None => Ok(result.into_owned()),
    }
}

/// Reads a YAML config file, substituting `${VAR}` references from the environment.
pub fn read_config(file_path: &Path) -> Result<BulkUpsertConfig, ReadConfigError> {
    dotenv().ok();

    let mut file = File::open(file_path)?;
    let mut contents = String::new();

    file.read_to_string(&mut contents)?;

    let contents = substitute_env_variables(&contents)?;

    BulkUpsertConfig::from_yaml_str(&contents)
}
