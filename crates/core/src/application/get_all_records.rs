use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::domain::request::{parse_body, RecordsRequest};
use crate::domain::response::ApiResponse;
use crate::ports::spreadsheet_reader::SpreadsheetReader;

/// Answers one invocation event. Never fails: validation problems become 400, every fetch
/// failure becomes 500, both with an `{"error": message}` body.
#[instrument(skip_all)]
pub async fn handle_request(event: &Value, reader: &dyn SpreadsheetReader) -> ApiResponse {
    let body = parse_body(event);

    let request = match RecordsRequest::from_body(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!("Validation error: {}", err);
            return ApiResponse::bad_request(err);
        }
    };

    info!(
        spreadsheet_id = %request.spreadsheet_id,
        sheet_name = ?request.sheet_name,
        "Request received to fetch records"
    );

    match reader.fetch_all_records(&request.spreadsheet_ref()).await {
        Ok(records) => ApiResponse::ok(&records),
        Err(report) => {
            error!("Error in request handler: {:?}", report);
            ApiResponse::internal_error(report.current_context())
        }
    }
}
