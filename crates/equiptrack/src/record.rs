//! Core record types for equiptrack.
//!
//! This module defines the equipment assignment record, the closed set of
//! fields it carries, and the partial record used as input to the store.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;

/// Sentinel stored in place of an empty field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Legacy seed key that predates `dockingStation`.
pub const LEGACY_DOCKING_KEY: &str = "docking";

/// Key of the identifier in JSON documents.
pub const ID_KEY: &str = "id";

/// One of the named fields of an assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Login of the person holding the equipment.
    Usuario,
    /// Full name of the person.
    Nombre,
    /// Job title.
    Cargo,
    /// Site where the person works.
    Sede,
    /// Directorate.
    Direccion,
    /// Management unit.
    Gerencia,
    /// Kind of device (laptop, desktop...).
    TipoEquipo,
    /// Device brand.
    Marca,
    /// Device model.
    Modelo,
    /// Device serial number.
    Serial,
    /// Device condition.
    Estado,
    /// Contract type (owned, leased...).
    TipoContrato,
    /// Status of the signed handover record.
    EstadoActa,
    /// Delivery date, `YYYY-MM-DD`.
    FechaEntrega,
    /// Laptop accessory.
    Laptop,
    /// Laptop charger.
    CargadorLaptop,
    /// Docking station.
    DockingStation,
    /// Docking station charger.
    CargadorDocking,
    /// Monitor.
    Monitor,
    /// Carrying case.
    Maleta,
    /// Security cable.
    Guaya,
    /// Adapter.
    Adaptador,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 22] = [
        Field::Usuario,
        Field::Nombre,
        Field::Cargo,
        Field::Sede,
        Field::Direccion,
        Field::Gerencia,
        Field::TipoEquipo,
        Field::Marca,
        Field::Modelo,
        Field::Serial,
        Field::Estado,
        Field::TipoContrato,
        Field::EstadoActa,
        Field::FechaEntrega,
        Field::Laptop,
        Field::CargadorLaptop,
        Field::DockingStation,
        Field::CargadorDocking,
        Field::Monitor,
        Field::Maleta,
        Field::Guaya,
        Field::Adaptador,
    ];

    /// Columns shown in the summary table.
    pub const SUMMARY: [Field; 8] = [
        Field::Usuario,
        Field::Nombre,
        Field::Cargo,
        Field::Sede,
        Field::TipoEquipo,
        Field::Marca,
        Field::Serial,
        Field::Estado,
    ];

    /// Extra columns shown when details are expanded.
    pub const DETAILS: [Field; 14] = [
        Field::Direccion,
        Field::Gerencia,
        Field::Modelo,
        Field::TipoContrato,
        Field::EstadoActa,
        Field::FechaEntrega,
        Field::Laptop,
        Field::CargadorLaptop,
        Field::DockingStation,
        Field::CargadorDocking,
        Field::Monitor,
        Field::Maleta,
        Field::Guaya,
        Field::Adaptador,
    ];

    /// Fields a save is rejected without.
    pub const REQUIRED: [Field; 8] = [
        Field::Usuario,
        Field::Nombre,
        Field::Cargo,
        Field::Sede,
        Field::TipoEquipo,
        Field::Marca,
        Field::Serial,
        Field::Estado,
    ];

    /// JSON key of this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Usuario => "usuario",
            Self::Nombre => "nombre",
            Self::Cargo => "cargo",
            Self::Sede => "sede",
            Self::Direccion => "direccion",
            Self::Gerencia => "gerencia",
            Self::TipoEquipo => "tipoEquipo",
            Self::Marca => "marca",
            Self::Modelo => "modelo",
            Self::Serial => "serial",
            Self::Estado => "estado",
            Self::TipoContrato => "tipoContrato",
            Self::EstadoActa => "estadoActa",
            Self::FechaEntrega => "fechaEntrega",
            Self::Laptop => "laptop",
            Self::CargadorLaptop => "cargadorLaptop",
            Self::DockingStation => "dockingStation",
            Self::CargadorDocking => "cargadorDocking",
            Self::Monitor => "monitor",
            Self::Maleta => "maleta",
            Self::Guaya => "guaya",
            Self::Adaptador => "adaptador",
        }
    }

    /// Column header for this field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Usuario => "Usuario",
            Self::Nombre => "Nombre",
            Self::Cargo => "Cargo",
            Self::Sede => "Sede",
            Self::Direccion => "Dirección",
            Self::Gerencia => "Gerencia",
            Self::TipoEquipo => "Tipo Equipo",
            Self::Marca => "Marca",
            Self::Modelo => "Modelo",
            Self::Serial => "Serial",
            Self::Estado => "Estado",
            Self::TipoContrato => "Tipo Contrato",
            Self::EstadoActa => "Estado Acta",
            Self::FechaEntrega => "Fecha Entrega",
            Self::Laptop => "Laptop",
            Self::CargadorLaptop => "Cargador Laptop",
            Self::DockingStation => "Docking Station",
            Self::CargadorDocking => "Cargador Docking",
            Self::Monitor => "Monitor",
            Self::Maleta => "Maleta",
            Self::Guaya => "Guaya",
            Self::Adaptador => "Adaptador",
        }
    }

    /// Look a field up by its JSON key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Whether a save is rejected when this field is blank.
    #[must_use]
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Accepts the JSON key, case-insensitively, and the legacy `docking` key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case(LEGACY_DOCKING_KEY) {
            return Ok(Self::DockingStation);
        }
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownField {
                name: wanted.to_string(),
            })
    }
}

/// Coerce a loose JSON value to the string it is compared and shown as.
///
/// `null` counts as missing.
#[must_use]
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}

/// Read a record id out of a loose JSON value.
///
/// Numeric strings count; anything else reads as `None`.
fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A partial record: the field values an operator typed into the form.
///
/// Keys are restricted to [`Field`], so an `id` can never be smuggled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordFields(BTreeMap<Field, String>);

impl RecordFields {
    /// Create an empty set of fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Remove a field value.
    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterate over the fields that have a value.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Number of fields with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build from a loose JSON object.
    ///
    /// `id`, unknown keys and `null` values are ignored; other values are
    /// stringified. The legacy `docking` key fills `dockingStation` when the
    /// latter is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataShape`] if `value` is not an object.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidDataShape {
                found: json_type_name(value),
            });
        };

        let mut fields = Self::new();
        for field in Field::ALL {
            if let Some(text) = map.get(field.key()).and_then(stringify) {
                fields.set(field, text);
            }
        }
        if fields.get(Field::DockingStation).map_or(true, str::is_empty) {
            if let Some(text) = map.get(LEGACY_DOCKING_KEY).and_then(stringify) {
                fields.set(Field::DockingStation, text);
            }
        }
        Ok(fields)
    }

    /// Every field, trimmed, with blanks replaced by [`NOT_AVAILABLE`].
    #[must_use]
    pub fn normalized(&self) -> BTreeMap<Field, String> {
        Field::ALL
            .into_iter()
            .map(|field| {
                let value = self.get(field).map(str::trim).unwrap_or_default();
                let value = if value.is_empty() {
                    NOT_AVAILABLE
                } else {
                    value
                };
                (field, value.to_string())
            })
            .collect()
    }
}

impl FromIterator<(Field, String)> for RecordFields {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Name of a JSON value's type, for error messages.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An equipment assignment: who holds which device and accessories.
///
/// Records created or updated through the store always carry every field,
/// trimmed, with [`NOT_AVAILABLE`] for blanks. Seeded records are kept as
/// loaded and may miss fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    /// Identifier assigned by the store; `0` until the store numbers an
    /// unnumbered seed record.
    pub id: u64,
    fields: BTreeMap<Field, String>,
    extra: BTreeMap<String, String>,
}

impl AssignmentRecord {
    /// Create a record from form input, normalizing every field.
    #[must_use]
    pub fn from_fields(id: u64, fields: &RecordFields) -> Self {
        Self {
            id,
            fields: fields.normalized(),
            extra: BTreeMap::new(),
        }
    }

    /// Create a record from a seed object.
    ///
    /// Values are stringified, `null` counts as missing, keys that are not
    /// fields are kept as extras, and the legacy `docking` key is migrated
    /// into `dockingStation`.
    #[must_use]
    pub fn from_seed(object: &Map<String, Value>) -> Self {
        let id = object.get(ID_KEY).and_then(parse_id).unwrap_or_else(|| {
            debug!(raw = ?object.get(ID_KEY), "Seed record without a numeric id");
            0
        });

        let mut fields = BTreeMap::new();
        let mut extra = BTreeMap::new();
        for (key, value) in object {
            if key == ID_KEY {
                continue;
            }
            let Some(text) = stringify(value) else {
                continue;
            };
            match Field::from_key(key) {
                Some(field) => {
                    fields.insert(field, text);
                }
                None => {
                    extra.insert(key.clone(), text);
                }
            }
        }

        if let Some(legacy) = extra.remove(LEGACY_DOCKING_KEY) {
            let current = fields.get(&Field::DockingStation);
            if current.map_or(true, String::is_empty) {
                debug!(id, "Migrating legacy docking field to dockingStation");
                fields.insert(Field::DockingStation, legacy);
            }
        }

        Self { id, fields, extra }
    }

    /// Raw value of a field, if present.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Value of a field as shown in the table: blanks read as `N/A`.
    #[must_use]
    pub fn display(&self, field: Field) -> &str {
        match self.get(field) {
            Some(value) if !value.is_empty() => value,
            _ => NOT_AVAILABLE,
        }
    }

    /// Keys from the seed document that are not assignment fields.
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Every stringified value of the record, id included, as searched by the
    /// free-text query.
    pub fn search_values(&self) -> impl Iterator<Item = std::borrow::Cow<'_, str>> {
        std::iter::once(std::borrow::Cow::Owned(self.id.to_string()))
            .chain(self.fields.values().map(|v| std::borrow::Cow::Borrowed(v.as_str())))
            .chain(self.extra.values().map(|v| std::borrow::Cow::Borrowed(v.as_str())))
    }

    /// The record's fields as a form would prefill them.
    ///
    /// The `N/A` sentinel comes back as an empty string.
    #[must_use]
    pub fn to_form(&self) -> RecordFields {
        Field::ALL
            .into_iter()
            .map(|field| {
                let value = match self.get(field) {
                    Some(NOT_AVAILABLE) | None => String::new(),
                    Some(value) => value.to_string(),
                };
                (field, value)
            })
            .collect()
    }

    /// Replace every field with normalized input. The id is untouched.
    pub(crate) fn overwrite(&mut self, fields: &RecordFields) {
        self.fields = fields.normalized();
        self.extra.clear();
    }
}

impl Serialize for AssignmentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.fields.len() + self.extra.len()))?;
        map.serialize_entry(ID_KEY, &self.id)?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.key(), value)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AssignmentRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(object) => Ok(Self::from_seed(&object)),
            other => Err(de::Error::custom(format!(
                "expected an object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}
