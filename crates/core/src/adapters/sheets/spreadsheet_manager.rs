use error_stack::{report, Report, ResultExt};
use google_sheets4::{hyper, Sheets};
use serde_json::Value;
use std::fmt::Debug;
use tracing::instrument;

use crate::adapters::config::sheets_config::SpreadsheetConfig;
use crate::domain::sheets::worksheet::WorksheetInfo;
use crate::ports::spreadsheet_reader::FetchError;

use super::{
    auth::{self, CredentialError},
    http_client::{self, HttpClientError, HttpsConnector},
};

/// Cells are read as the sheet displays them: `50%` stays `"50%"`, `$1,234.50` stays
/// `"$1,234.50"`. This is also the API default.
const VALUE_RENDER_OPTION: &str = "FORMATTED_VALUE";

/// One authorized session against one spreadsheet. Built per fetch, never reused.
pub struct SpreadsheetManager {
    pub spreadsheet_id: String,
    scope: &'static str,
    hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SpreadsheetManager {{ spreadsheet_id: {:?} }}",
            self.spreadsheet_id
        )
    }
}

impl SpreadsheetManager {
    #[instrument(name = "SpreadsheetManager::new", skip(config))]
    pub async fn new(
        config: &SpreadsheetConfig,
        spreadsheet_id: &str,
    ) -> error_stack::Result<Self, FetchError> {
        let client = http_client::http_client().map_err(client_failed)?;
        let credential = auth::load_credentials(config, client.clone())
            .await
            .map_err(credentials_failed)?;
        let scope = credential.scope();
        let hub = Sheets::new(client, credential.into_authenticator());

        Ok(SpreadsheetManager {
            spreadsheet_id: spreadsheet_id.to_string(),
            scope,
            hub,
        })
    }

    /// Lists the worksheets of the spreadsheet. Resolves the spreadsheet itself, so an unknown
    /// id surfaces here as [`FetchError::SpreadsheetNotFound`].
    #[instrument]
    pub async fn worksheets(&self) -> error_stack::Result<Vec<WorksheetInfo>, FetchError> {
        let response = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .include_grid_data(false)
            .add_scope(self.scope)
            .doit()
            .await
            .map_err(|err| self.classify(err))?;

        let sheets = response.1.sheets.unwrap_or_default();
        Ok(sheets
            .into_iter()
            .filter_map(|sheet| sheet.properties)
            .enumerate()
            .filter_map(|(position, properties)| {
                Some(WorksheetInfo {
                    title: properties.title?,
                    index: properties.index.unwrap_or(position as i32),
                })
            })
            .collect())
    }

    /// Reads the formatted value grid of `range`. Trailing empty rows and columns are not returned
    /// by the API; an entirely empty range yields an empty grid.
    #[instrument]
    pub async fn read_range(
        &self,
        range: &str,
    ) -> error_stack::Result<Vec<Vec<Value>>, FetchError> {
        let response = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, range)
            .value_render_option(VALUE_RENDER_OPTION)
            .add_scope(self.scope)
            .doit()
            .await
            .map_err(|err| self.classify(err))
            .attach_printable_lazy(|| format!("Failed to fetch values for range {}", range))?;

        Ok(response.1.values.unwrap_or_default())
    }

    fn classify(&self, err: google_sheets4::Error) -> error_stack::Report<FetchError> {
        if is_not_found(&err) {
            tracing::error!("Spreadsheet with ID {} not found.", self.spreadsheet_id);
            return report!(FetchError::SpreadsheetNotFound(self.spreadsheet_id.clone()))
                .attach_printable(err.to_string());
        }

        tracing::error!("Unexpected error: {}", err);
        report!(FetchError::unexpected(err.to_string()))
    }
}

fn client_failed(report: Report<HttpClientError>) -> Report<FetchError> {
    let reason = report.current_context().to_string();
    tracing::error!("Unexpected error: {}", reason);
    report.change_context(FetchError::Unexpected(reason))
}

/// Any failure to load the service-account key becomes [`FetchError::Credentials`], keeping the
/// loader's message as the reason.
fn credentials_failed(report: Report<CredentialError>) -> Report<FetchError> {
    let reason = report.current_context().to_string();
    report.change_context(FetchError::Credentials(reason))
}

/// Whether the API rejected the call because the spreadsheet does not exist.
pub fn is_not_found(err: &google_sheets4::Error) -> bool {
    match err {
        google_sheets4::Error::BadRequest(body) => {
            body.pointer("/error/code").and_then(Value::as_u64) == Some(404)
        }
        google_sheets4::Error::Failure(response) => {
            response.status() == hyper::StatusCode::NOT_FOUND
        }
        _ => false,
    }
}
