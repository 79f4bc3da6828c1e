use serde::{Deserialize, Serialize};

/// One column of the result schema as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Engine type signature, e.g. "bigint", "varchar(25)"
    #[serde(rename = "type", default)]
    pub data_type: String,
}
