use serde::{Deserialize, Serialize};

/// Error details for a failed query, as sent in the envelope's `error` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Human-readable error message
    #[serde(default)]
    pub message: String,

    /// Numeric engine error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,

    /// Symbolic error name, e.g. "SYNTAX_ERROR"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,

    /// Error category, e.g. "USER_ERROR", "INTERNAL_ERROR"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_name {
            Some(name) => write!(f, "{}: {}", name, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
