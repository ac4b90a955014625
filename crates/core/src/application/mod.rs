pub mod get_all_records;
