//! Error types shared by the store, the exercises and the CLI.

use thiserror::Error;

/// Problems found while reading `bookstore.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be set")]
    MissingField { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("cannot read configuration file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("configuration is not valid TOML: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Everything a store call or lesson can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("query failed: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("no database connection available: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("migrations failed: {0}")]
    Migration(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("background query failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::NotFound`] for the given entity and lookup key.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// True when the error is Diesel's "no rows returned".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Database(inner) => matches!(inner, diesel::result::Error::NotFound),
            _ => false,
        }
    }
}

/// Result alias over [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = Error::not_found("customer", "newuser@example.com");
        assert_eq!(err.to_string(), "customer not found: newuser@example.com");
        assert!(err.is_not_found());
    }

    #[test]
    fn diesel_not_found_is_recognised() {
        let err = Error::from(diesel::result::Error::NotFound);
        assert!(err.is_not_found());
        assert!(!Error::Validation("bad".into()).is_not_found());
    }

    #[test]
    fn config_error_is_transparent() {
        let err = Error::from(ConfigError::InvalidValue {
            field: "database.pool_size",
            reason: "must be at least 1".into(),
        });
        assert_eq!(
            err.to_string(),
            "database.pool_size is invalid: must be at least 1"
        );
    }
}
