pub mod spreadsheet_reader;
