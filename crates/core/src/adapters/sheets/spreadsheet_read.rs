use tracing::{info, instrument};

use crate::adapters::config::sheets_config::SpreadsheetConfig;
use crate::domain::sheets::{
    record::{records_from_values, Record},
    spreadsheet_ref::SpreadsheetRef,
    worksheet::{resolve_worksheet, whole_sheet_range},
};
use crate::ports::spreadsheet_reader::{FetchError, SpreadsheetReader};

use super::spreadsheet_manager::SpreadsheetManager;

/// Reads worksheets through the Google Sheets API with a service-account key.
#[derive(Debug, Clone)]
pub struct GoogleSheetsReader {
    config: SpreadsheetConfig,
}

impl GoogleSheetsReader {
    pub fn new(config: SpreadsheetConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SpreadsheetReader for GoogleSheetsReader {
    #[instrument(skip(self), fields(spreadsheet = %reference))]
    async fn fetch_all_records(
        &self,
        reference: &SpreadsheetRef,
    ) -> error_stack::Result<Vec<Record>, FetchError> {
        let manager = SpreadsheetManager::new(&self.config, &reference.spreadsheet_id).await?;

        info!("Opening spreadsheet with ID: {}", reference.spreadsheet_id);
        let worksheets = manager.worksheets().await?;

        let worksheet = resolve_worksheet(&worksheets, reference)?;

        let values = manager.read_range(&whole_sheet_range(&worksheet.title)).await?;
        let records = records_from_values(values);

        info!("Retrieved {} records from spreadsheet.", records.len());
        Ok(records)
    }
}
