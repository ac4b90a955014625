pub const DEFAULT_PRIV_KEY: &str = "client_secret.json";

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetConfig {
    /// Path to the service-account key file, relative to the working directory.
    pub priv_key: Box<str>,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        SpreadsheetConfig {
            priv_key: DEFAULT_PRIV_KEY.into(),
        }
    }
}
