use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use sheets_records_core::adapters::config::app_config::AppConfig;
use sheets_records_core::adapters::sheets::spreadsheet_read::GoogleSheetsReader;
use sheets_records_core::{handle_request, logging, ApiResponse};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init_lambda_logging();

    let config = AppConfig::load().map_err(|report| {
        tracing::error!("{:?}", report);
        Error::from(report.current_context().to_string())
    })?;
    tracing::info!(priv_key = %config.sheets.priv_key, "Starting get_sheets_all_records");

    let reader = GoogleSheetsReader::new(config.sheets);
    let reader = &reader;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiResponse, Error>(handle_request(&event.payload, reader).await)
    }))
    .await
}
