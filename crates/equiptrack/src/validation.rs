//! Form validation applied before a save reaches the store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::record::{Field, RecordFields};

/// Shape a delivery date must have.
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Format used to check the date is a real calendar day.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Message for a delivery date that is not a real `YYYY-MM-DD` day.
pub const INVALID_DATE_MESSAGE: &str = "La fecha debe tener formato válido (AAAA-MM-DD)";

fn date_regex() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is a valid regex"))
}

/// Per-field validation messages, keyed by the offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    /// Record a message for a field, replacing any earlier one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterate over failed fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Check that a delivery date is `YYYY-MM-DD` and names a real day.
#[must_use]
pub fn is_valid_date(value: &str) -> bool {
    date_regex().is_match(value) && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

/// Message shown when a required field is left blank.
#[must_use]
pub fn required_message(field: Field) -> String {
    match field {
        Field::Usuario => "El usuario es requerido".to_string(),
        Field::Nombre => "El nombre es requerido".to_string(),
        Field::Cargo => "El cargo es requerido".to_string(),
        Field::Sede => "La sede es requerida".to_string(),
        Field::TipoEquipo => "El tipo de equipo es requerido".to_string(),
        Field::Marca => "La marca es requerida".to_string(),
        Field::Serial => "El serial es requerido".to_string(),
        Field::Estado => "El estado es requerido".to_string(),
        other => format!("El campo {} es requerido", other.label()),
    }
}

/// Validate form input.
///
/// Required fields must be non-blank after trimming, and a non-blank
/// `fechaEntrega` must be a valid ISO date.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate(fields: &RecordFields) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field in Field::REQUIRED {
        let blank = fields.get(field).map_or(true, |v| v.trim().is_empty());
        if blank {
            errors.insert(field, required_message(field));
        }
    }

    if let Some(date) = fields.get(Field::FechaEntrega).map(str::trim) {
        if !date.is_empty() && !is_valid_date(date) {
            errors.insert(Field::FechaEntrega, INVALID_DATE_MESSAGE);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
