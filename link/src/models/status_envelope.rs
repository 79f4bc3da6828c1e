use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{Column, ErrorDetail, QueryStats, Row};

/// One decoded server response for an in-flight query.
///
/// Every field is optional on the wire. The envelope is transient: it is
/// merged into the session and dropped.
///
/// # Wire format
///
/// ```json
/// {
///   "id": "20240101_000000_00001_abcde",
///   "infoUri": "http://engine:8080/ui/query.html?20240101_000000_00001_abcde",
///   "nextUri": "http://engine:8080/v1/statement/20240101_000000_00001_abcde/2",
///   "partialCancelUri": "http://engine:8080/v1/stage/20240101_000000_00001_abcde.0",
///   "columns": [{"name": "_col0", "type": "integer"}],
///   "data": [[1]],
///   "stats": {"state": "RUNNING"}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEnvelope {
    /// Server-assigned query id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Diagnostics document for the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_uri: Option<String>,

    /// Continuation URI; absent once the server has nothing more to send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_uri: Option<String>,

    /// URI used to request early termination
    #[serde(
        default,
        alias = "partialcancelUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub partial_cancel_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,

    /// Result batch carried by this response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<QueryStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,

    /// Statement kind for non-query statements, e.g. "CREATE TABLE"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_count: Option<u64>,
}

impl StatusEnvelope {
    /// Decode a response body into an envelope. Unknown fields are ignored.
    pub fn decode(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// The `stats.state` tag, if the envelope carries statistics
    pub fn state_tag(&self) -> Option<&str> {
        self.stats.as_ref().and_then(|stats| stats.state.as_deref())
    }

    /// Number of rows in this envelope's batch
    pub fn batch_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}
