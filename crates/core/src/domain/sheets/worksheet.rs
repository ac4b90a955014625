use error_stack::report;

use crate::domain::sheets::spreadsheet_ref::SpreadsheetRef;
use crate::ports::spreadsheet_reader::FetchError;

/// Title and tab position of one worksheet, as reported by the spreadsheet metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetInfo {
    pub title: String,
    pub index: i32,
}

/// Picks the worksheet named `sheet_name`, or the first tab when no name is given.
pub fn select_worksheet<'a>(
    worksheets: &'a [WorksheetInfo],
    sheet_name: Option<&str>,
) -> Option<&'a WorksheetInfo> {
    match sheet_name {
        Some(name) => worksheets.iter().find(|sheet| sheet.title == name),
        None => worksheets.iter().min_by_key(|sheet| sheet.index),
    }
}

/// Like [`select_worksheet`], but a miss becomes the error the caller reports: an unknown name
/// is [`FetchError::WorksheetNotFound`], a spreadsheet without tabs is [`FetchError::Unexpected`].
pub fn resolve_worksheet<'a>(
    worksheets: &'a [WorksheetInfo],
    reference: &SpreadsheetRef,
) -> error_stack::Result<&'a WorksheetInfo, FetchError> {
    if let Some(worksheet) = select_worksheet(worksheets, reference.sheet_name()) {
        return Ok(worksheet);
    }

    match reference.sheet_name() {
        Some(name) => {
            tracing::error!("Worksheet with name {} not found.", name);
            Err(report!(FetchError::WorksheetNotFound(name.to_string())))
        }
        None => {
            let message = format!(
                "Spreadsheet with ID {} has no worksheets.",
                reference.spreadsheet_id
            );
            tracing::error!("{}", message);
            Err(report!(FetchError::unexpected(message)))
        }
    }
}

/// A1 range covering a whole worksheet. Single quotes in the title are doubled.
pub fn whole_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheets() -> Vec<WorksheetInfo> {
        vec![
            WorksheetInfo {
                title: "Second".to_string(),
                index: 1,
            },
            WorksheetInfo {
                title: "First".to_string(),
                index: 0,
            },
        ]
    }

    #[test]
    fn test_default_is_lowest_index() {
        let sheets = sheets();
        assert_eq!(select_worksheet(&sheets, None).unwrap().title, "First");
    }

    #[test]
    fn test_select_by_name() {
        let sheets = sheets();
        assert_eq!(
            select_worksheet(&sheets, Some("Second")).unwrap().title,
            "Second"
        );
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert!(select_worksheet(&sheets(), Some("Missing")).is_none());
    }

    #[test]
    fn test_no_worksheets() {
        assert!(select_worksheet(&[], None).is_none());
    }

    #[test]
    fn test_resolve_default_worksheet() {
        let sheets = sheets();
        let reference = SpreadsheetRef::new("abc", None);
        assert_eq!(resolve_worksheet(&sheets, &reference).unwrap().title, "First");
    }

    #[test]
    fn test_resolve_named_worksheet() {
        let sheets = sheets();
        let reference = SpreadsheetRef::new("abc", Some("Second".to_string()));
        assert_eq!(
            resolve_worksheet(&sheets, &reference).unwrap().title,
            "Second"
        );
    }

    #[test]
    fn test_resolve_unknown_name_is_worksheet_not_found() {
        let reference = SpreadsheetRef::new("abc", Some("Missing".to_string()));
        let report = resolve_worksheet(&sheets(), &reference).unwrap_err();

        assert_eq!(
            report.current_context(),
            &FetchError::WorksheetNotFound("Missing".to_string())
        );
        assert_eq!(
            report.current_context().to_string(),
            "Worksheet not found with name Missing."
        );
    }

    #[test]
    fn test_resolve_without_worksheets_is_unexpected() {
        let reference = SpreadsheetRef::new("abc", None);
        let report = resolve_worksheet(&[], &reference).unwrap_err();

        assert_eq!(
            report.current_context(),
            &FetchError::Unexpected("Spreadsheet with ID abc has no worksheets.".to_string())
        );
    }

    #[test]
    fn test_whole_sheet_range_quotes_title() {
        assert_eq!(whole_sheet_range("Sheet1"), "'Sheet1'");
        assert_eq!(whole_sheet_range("Ana's data"), "'Ana''s data'");
    }
}
