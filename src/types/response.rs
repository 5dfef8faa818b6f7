//! Response type definitions
//!
//! JSON bodies returned by the site's login and check-in endpoints.

use serde::{Deserialize, Serialize};

use super::serde_helpers::{deserialize_display_string, deserialize_lenient_string};

/// Code the site uses for success
pub const SUCCESS_CODE: i64 = 0;

/// Generic `{code, msg, data}` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Status code; only the number `0` means success, the string `"0"` does not
    #[serde(default)]
    pub code: Option<serde_json::Value>,

    /// Human-readable message
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub msg: Option<String>,

    /// Endpoint-specific payload; the site sends `[]` when empty
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Payload of a successful check-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignData {
    /// Point balance after the check-in
    #[serde(default, deserialize_with = "deserialize_display_string")]
    pub points: Option<String>,

    /// Consecutive check-in days after the check-in
    #[serde(default, deserialize_with = "deserialize_display_string")]
    pub sign_days: Option<String>,
}

impl ApiResponse {
    /// Parse a body, returning `None` when it is not a JSON object
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body.trim()).ok()
    }

    /// Whether the code signals success
    pub fn is_success(&self) -> bool {
        match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(SUCCESS_CODE),
            _ => false,
        }
    }

    /// Message or an empty string
    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or_default()
    }

    /// Check-in payload, if `data` is an object
    pub fn sign_data(&self) -> Option<SignData> {
        match &self.data {
            Some(value @ serde_json::Value::Object(_)) => {
                serde_json::from_value(value.clone()).ok()
            }
            _ => None,
        }
    }
}
