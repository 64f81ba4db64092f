//! Error types for equiptrack.
//!
//! This module defines all error types used throughout the equiptrack crate.
//! Load failures carry the raw message shown to the operator; validation
//! failures carry per-field messages; `NotFound` marks a stale target id.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// The main error type for equiptrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Load Errors ===
    /// The seed resource could not be fetched or was rejected.
    #[error("{message}")]
    LoadFailure {
        /// Raw message surfaced to the operator.
        message: String,
    },

    /// The seed document is neither a sequence of records nor a single record.
    #[error("invalid data shape: expected an array or an object, found {found}")]
    InvalidDataShape {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// HTTP transport failed while fetching the seed document.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // === Record Errors ===
    /// One or more fields were rejected before reaching the store.
    #[error("datos inválidos: {0}")]
    Validation(ValidationErrors),

    /// No record carries the requested id.
    #[error("no existe la asignación con id {id}")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// A field name did not match any assignment field.
    #[error("campo desconocido: {name}")]
    UnknownField {
        /// The name that was given.
        name: String,
    },

    /// Every id up to `u64::MAX` has been handed out.
    #[error("no quedan identificadores disponibles")]
    IdSpaceExhausted,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for equiptrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Create a new load failure.
    #[must_use]
    pub fn load_failure(message: impl Into<String>) -> Self {
        Self::LoadFailure {
            message: message.into(),
        }
    }

    /// Create a not-found error for the given id.
    #[must_use]
    pub fn not_found(id: u64) -> Self {
        Self::NotFound { id }
    }

    /// Check if this error happened while loading the seed collection.
    ///
    /// Any of these leaves the UI in a terminal error state.
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::LoadFailure { .. }
                | Self::InvalidDataShape { .. }
                | Self::Http(_)
                | Self::Io(_)
                | Self::Json(_)
        )
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error indicates a stale or unknown record id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Per-field messages, when this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn test_load_failure_display_is_raw_message() {
        let err = Error::load_failure("HTTP error: 404");
        assert_eq!(err.to_string(), "HTTP error: 404");
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_invalid_data_shape_display() {
        let err = Error::InvalidDataShape { found: "number" };
        let msg = err.to_string();
        assert!(msg.contains("invalid data shape"));
        assert!(msg.contains("number"));
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_not_found() {
        let err = Error::not_found(7);
        assert_eq!(err.to_string(), "no existe la asignación con id 7");
        assert!(err.is_not_found());
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_validation_error() {
        let mut errors = ValidationErrors::default();
        errors.insert(Field::Usuario, "El usuario es requerido");
        let err: Error = errors.into();

        assert!(err.is_validation());
        assert!(err.to_string().contains("El usuario es requerido"));
        let fields = err.validation_errors().unwrap();
        assert_eq!(fields.get(Field::Usuario), Some("El usuario es requerido"));
    }

    #[test]
    fn test_validation_errors_absent_for_other_variants() {
        assert!(Error::not_found(1).validation_errors().is_none());
    }

    #[test]
    fn test_unknown_field_display() {
        let err = Error::UnknownField {
            name: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "campo desconocido: colour");
    }

    #[test]
    fn test_id_space_exhausted_display() {
        let err = Error::IdSpaceExhausted;
        assert_eq!(err.to_string(), "no quedan identificadores disponibles");
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "timeout_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
