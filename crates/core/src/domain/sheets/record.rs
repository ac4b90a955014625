use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One worksheet row keyed by the header row. Keys keep the column order of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Record(Map::new())
    }

    pub fn insert<K: Into<String>>(&mut self, header: K, value: Value) {
        self.0.insert(header.into(), value);
    }
}

impl Deref for Record {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (header, value) in iter {
            record.insert(header, value);
        }
        record
    }
}

/// Renders a header cell as a map key.
fn header_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

fn blank() -> Value {
    Value::String(String::new())
}

/// Turns a raw value grid (first row = headers) into records.
///
/// Short rows are padded with blanks and cells past the last header are dropped, so every
/// record has exactly one entry per header. A grid with no data rows yields no records.
pub fn records_from_values(values: Vec<Vec<Value>>) -> Vec<Record> {
    let mut rows = values.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    rows.map(|row| {
        let mut cells = row.into_iter();
        headers
            .iter()
            .map(|header| {
                let value = match cells.next() {
                    Some(Value::Null) | None => blank(),
                    Some(value) => value,
                };
                (header.clone(), value)
            })
            .collect()
    })
    .collect()
}
