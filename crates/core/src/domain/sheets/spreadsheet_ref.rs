use std::fmt::Formatter;

/// Identifies what to read: a spreadsheet and, optionally, one of its worksheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetRef {
    pub spreadsheet_id: String,
    sheet_name: Option<String>,
}

impl SpreadsheetRef {
    pub fn new<S: Into<String>>(spreadsheet_id: S, sheet_name: Option<String>) -> Self {
        SpreadsheetRef {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.filter(|name| !name.is_empty()),
        }
    }

    /// The requested worksheet, `None` meaning the first one.
    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }
}

impl std::fmt::Display for SpreadsheetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.sheet_name {
            Some(name) => write!(f, "{} ({})", self.spreadsheet_id, name),
            None => write!(f, "{} (first worksheet)", self.spreadsheet_id),
        }
    }
}
