use serde::{Deserialize, Serialize};

use crate::error::SqlBatchError;
use crate::types::DatabaseType;

/// Transport limits a connector imposes on one merged command.
///
/// Every bound must be at least 1. Limits are injected into each batch at construction and
/// never read from globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLimits {
    pub max_commands_per_batch: usize,
    pub max_parameters_per_command: usize,
    pub max_command_length: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_commands_per_batch: 100,
            max_parameters_per_command: 2100,
            max_command_length: 1_000_000,
        }
    }
}

impl BatchLimits {
    #[must_use]
    pub fn builder() -> BatchLimitsBuilder {
        BatchLimitsBuilder::new()
    }

    /// Parse limits from a JSON document such as
    /// `{"max_commands_per_batch": 50, "max_parameters_per_command": 2100, "max_command_length": 65536}`.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` if the document is malformed or a bound is zero.
    pub fn from_json(document: &str) -> Result<Self, SqlBatchError> {
        let limits: BatchLimits = serde_json::from_str(document)?;
        limits.validate()
    }

    /// Check that every bound is at least 1.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` naming the first invalid bound.
    pub fn validate(self) -> Result<Self, SqlBatchError> {
        let checks = [
            ("max_commands_per_batch", self.max_commands_per_batch),
            ("max_parameters_per_command", self.max_parameters_per_command),
            ("max_command_length", self.max_command_length),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(SqlBatchError::ConfigError(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        Ok(self)
    }
}

/// Fluent builder for [`BatchLimits`].
#[derive(Debug, Clone)]
pub struct BatchLimitsBuilder {
    limits: BatchLimits,
}

impl Default for BatchLimitsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchLimitsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            limits: BatchLimits::default(),
        }
    }

    /// Start from the defaults of a specific backend.
    #[must_use]
    pub fn for_database(db_type: DatabaseType) -> Self {
        Self {
            limits: db_type.default_limits(),
        }
    }

    #[must_use]
    pub fn max_commands_per_batch(mut self, value: usize) -> Self {
        self.limits.max_commands_per_batch = value;
        self
    }

    #[must_use]
    pub fn max_parameters_per_command(mut self, value: usize) -> Self {
        self.limits.max_parameters_per_command = value;
        self
    }

    #[must_use]
    pub fn max_command_length(mut self, value: usize) -> Self {
        self.limits.max_command_length = value;
        self
    }

    /// Validate and return the limits.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` if any bound is zero.
    pub fn finish(self) -> Result<BatchLimits, SqlBatchError> {
        self.limits.validate()
    }
}

impl DatabaseType {
    /// Conservative per-backend limits.
    #[must_use]
    pub fn default_limits(self) -> BatchLimits {
        match self {
            DatabaseType::Postgres => BatchLimits {
                max_commands_per_batch: 1000,
                max_parameters_per_command: 32767,
                max_command_length: 1_000_000,
            },
            DatabaseType::Sqlite => BatchLimits {
                max_commands_per_batch: 1000,
                max_parameters_per_command: 32766,
                max_command_length: 1_000_000,
            },
            DatabaseType::Mssql => BatchLimits {
                max_commands_per_batch: 100,
                max_parameters_per_command: 2100,
                max_command_length: 65536 * 4,
            },
            DatabaseType::Mysql => BatchLimits {
                max_commands_per_batch: 100,
                max_parameters_per_command: 65535,
                max_command_length: 4_194_304,
            },
            DatabaseType::Cassandra => BatchLimits {
                max_commands_per_batch: 50,
                max_parameters_per_command: 65535,
                max_command_length: 262_144,
            },
        }
    }
}
