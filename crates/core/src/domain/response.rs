use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Proxy-integration response envelope: `{statusCode, body, headers}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl ApiResponse {
    pub const OK: u16 = 200;
    pub const BAD_REQUEST: u16 = 400;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;

    fn json(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        ApiResponse {
            status_code,
            body,
            headers,
        }
    }

    /// 200 with `payload` encoded as the body.
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self::json(Self::OK, body),
            Err(err) => {
                tracing::error!("Failed to encode response body: {}", err);
                Self::error(Self::INTERNAL_SERVER_ERROR, err)
            }
        }
    }

    pub fn bad_request<M: ToString>(message: M) -> Self {
        Self::error(Self::BAD_REQUEST, message)
    }

    pub fn internal_error<M: ToString>(message: M) -> Self {
        Self::error(Self::INTERNAL_SERVER_ERROR, message)
    }

    fn error<M: ToString>(status_code: u16, message: M) -> Self {
        let body = json!({ "error": message.to_string() }).to_string();
        Self::json(status_code, body)
    }
}
