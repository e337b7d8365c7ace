/// Name the backend stores an uploaded feed under.
pub const FEED_FILE: &str = "feed.csv";

const SHEETS_PREFIXES: &[&str] = &[
    "https://docs.google.com/spreadsheets/d/",
    "http://docs.google.com/spreadsheets/d/",
    "https://docs.google.com/a/google.com/spreadsheets/d/",
    "http://docs.google.com/a/google.com/spreadsheets/d/",
];

/// Spreadsheet id from a Google Sheets URL.
///
/// Anything that is not a known Sheets URL is taken to be an id already.
pub fn spreadsheet_id(sheet_url: &str) -> &str {
    let rest = SHEETS_PREFIXES
        .iter()
        .find_map(|prefix| sheet_url.strip_prefix(prefix))
        .unwrap_or(sheet_url);
    rest.split('/').next().unwrap_or(rest)
}
