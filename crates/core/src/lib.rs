pub mod adapters;
pub mod application;
pub mod domain;
pub mod logging;
pub mod packager;
pub mod ports;

pub use application::get_all_records::handle_request;
pub use domain::response::ApiResponse;
pub use ports::spreadsheet_reader::{FetchError, SpreadsheetReader};
