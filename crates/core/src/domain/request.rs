use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::sheets::spreadsheet_ref::SpreadsheetRef;

pub const SPREADSHEET_ID_FIELD: &str = "spreadsheet_id";
pub const SHEET_NAME_FIELD: &str = "sheet_name";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid field: {0} must be a string")]
    NotAString(&'static str),
}

/// Extracts the JSON body of an invocation event.
///
/// The body may arrive as a JSON string (optionally base64 encoded, as API Gateway does for
/// binary payloads) or, on direct invocation, as an object. Anything absent, malformed or
/// not an object is read as an empty object.
pub fn parse_body(event: &Value) -> Map<String, Value> {
    let parsed = match event.get("body") {
        Some(Value::String(raw)) => decode_body(raw, is_base64_encoded(event)),
        Some(Value::Object(body)) => Some(Value::Object(body.clone())),
        _ => None,
    };

    match parsed {
        Some(Value::Object(body)) => body,
        _ => {
            tracing::debug!("Request body absent or not a JSON object; using empty body");
            Map::new()
        }
    }
}

fn is_base64_encoded(event: &Value) -> bool {
    event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn decode_body(raw: &str, base64_encoded: bool) -> Option<Value> {
    if base64_encoded {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(raw)
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    } else {
        serde_json::from_str(raw).ok()
    }
}

/// A validated request for all records of a worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsRequest {
    pub spreadsheet_id: String,
    pub sheet_name: Option<String>,
}

impl RecordsRequest {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let spreadsheet_id = match body.get(SPREADSHEET_ID_FIELD) {
            None | Some(Value::Null) => {
                return Err(ValidationError::MissingField(SPREADSHEET_ID_FIELD))
            }
            Some(Value::String(id)) => id.clone(),
            Some(_) => return Err(ValidationError::NotAString(SPREADSHEET_ID_FIELD)),
        };

        let sheet_name = match body.get(SHEET_NAME_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(ValidationError::NotAString(SHEET_NAME_FIELD)),
        };

        Ok(RecordsRequest {
            spreadsheet_id,
            sheet_name,
        })
    }

    pub fn spreadsheet_ref(&self) -> SpreadsheetRef {
        SpreadsheetRef::new(self.spreadsheet_id.clone(), self.sheet_name.clone())
    }
}
