//! Decoding of inbound sensor payloads.
//!
//! Transports hand over loosely-typed JSON objects keyed
//! `T_out`, `N_occ`, `T_set` and optionally `I_sol`, `Q_int`. Everything is
//! checked here so that the producer only ever steps the model with a
//! complete, finite [`SensorEvent`].

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::SensorEvent;

/// Raw message as delivered by an inbound transport
pub type SensorPayload = Value;

pub const FIELD_OUTDOOR_TEMP: &str = "T_out";
pub const FIELD_OCCUPANTS: &str = "N_occ";
pub const FIELD_SETPOINT: &str = "T_set";
pub const FIELD_SOLAR_GAIN: &str = "I_sol";
pub const FIELD_INTERNAL_GAIN: &str = "Q_int";

/// Reasons a single payload is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("Malformed JSON payload: {0}")]
    Json(String),
    #[error("Payload is not a JSON object")]
    NotAnObject,
    #[error("Missing required field {0}")]
    MissingField(&'static str),
    #[error("Field {field} is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },
    #[error("Field {field} is not a whole number: {value}")]
    NotAnInteger { field: &'static str, value: String },
    #[error("Field {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

impl IngestError {
    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IngestError::MissingField(field)
            | IngestError::NotNumeric { field, .. }
            | IngestError::NotAnInteger { field, .. }
            | IngestError::OutOfRange { field, .. } => Some(*field),
            IngestError::Json(_) | IngestError::NotAnObject => None,
        }
    }
}

/// Decode a raw byte payload (e.g. a broker message body)
pub fn decode_slice(bytes: &[u8]) -> Result<SensorEvent, IngestError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| IngestError::Json(e.to_string()))?;
    decode_payload(&value)
}

pub fn decode_payload(payload: &Value) -> Result<SensorEvent, IngestError> {
    let object = payload.as_object().ok_or(IngestError::NotAnObject)?;

    let outdoor_temp_c = required_number(object, FIELD_OUTDOOR_TEMP)?;
    let occupants = required_count(object, FIELD_OCCUPANTS)?;
    let setpoint_c = required_number(object, FIELD_SETPOINT)?;
    let solar_gain_w = optional_number(object, FIELD_SOLAR_GAIN)?.unwrap_or(0.0);
    let internal_gain_w = optional_number(object, FIELD_INTERNAL_GAIN)?;

    Ok(SensorEvent {
        outdoor_temp_c,
        occupants,
        setpoint_c,
        solar_gain_w,
        internal_gain_w,
    })
}

impl TryFrom<&Value> for SensorEvent {
    type Error = IngestError;

    fn try_from(payload: &Value) -> Result<Self, Self::Error> {
        decode_payload(payload)
    }
}

/// Wire form of an event, as published by sensor sources
pub fn encode_event(event: &SensorEvent) -> SensorPayload {
    let mut payload = json!({
        FIELD_OUTDOOR_TEMP: event.outdoor_temp_c,
        FIELD_OCCUPANTS: event.occupants,
        FIELD_SETPOINT: event.setpoint_c,
    });
    if event.solar_gain_w != 0.0 {
        payload[FIELD_SOLAR_GAIN] = json!(event.solar_gain_w);
    }
    if let Some(q_int) = event.internal_gain_w {
        payload[FIELD_INTERNAL_GAIN] = json!(q_int);
    }
    payload
}

// null counts as absent
fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|v| !v.is_null())
}

fn required_number(object: &Map<String, Value>, name: &'static str) -> Result<f64, IngestError> {
    let value = field(object, name).ok_or(IngestError::MissingField(name))?;
    as_finite(value, name)
}

fn optional_number(
    object: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<f64>, IngestError> {
    field(object, name).map(|v| as_finite(v, name)).transpose()
}

fn as_finite(value: &Value, name: &'static str) -> Result<f64, IngestError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::NotNumeric {
            field: name,
            value: value.to_string(),
        })
}

fn required_count(object: &Map<String, Value>, name: &'static str) -> Result<u32, IngestError> {
    let value = field(object, name).ok_or(IngestError::MissingField(name))?;
    let number = as_finite(value, name)?;

    if number.fract() != 0.0 {
        return Err(IngestError::NotAnInteger {
            field: name,
            value: value.to_string(),
        });
    }
    if number < 0.0 || number > f64::from(u32::MAX) {
        return Err(IngestError::OutOfRange {
            field: name,
            value: value.to_string(),
        });
    }
    Ok(number as u32)
}
