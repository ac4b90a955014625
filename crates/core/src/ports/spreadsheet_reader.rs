use thiserror::Error;

use crate::domain::sheets::{record::Record, spreadsheet_ref::SpreadsheetRef};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Spreadsheet not found with ID {0}.")]
    SpreadsheetNotFound(String),
    #[error("Worksheet not found with name {0}.")]
    WorksheetNotFound(String),
    #[error("Error loading credentials: {0}")]
    Credentials(String),
    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn unexpected<S: Into<String>>(details: S) -> Self {
        FetchError::Unexpected(details.into())
    }
}

#[async_trait::async_trait]
pub trait SpreadsheetReader: Send + Sync {
    /// Fetches every data row of the referenced worksheet, in sheet order. Row 1 supplies the
    /// record keys. An empty worksheet yields an empty vector.
    async fn fetch_all_records(
        &self,
        reference: &SpreadsheetRef,
    ) -> error_stack::Result<Vec<Record>, FetchError>;
}
