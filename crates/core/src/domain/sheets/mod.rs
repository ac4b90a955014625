pub mod record;
pub mod spreadsheet_ref;
pub mod worksheet;
