use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use super::{Column, QueryStats, Row};

/// Complete result of a finished query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResults {
    /// Server-assigned query id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,

    /// Result schema (empty for statements that return no rows)
    #[serde(default)]
    pub columns: Vec<Column>,

    /// All rows, in arrival order
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Final execution statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<QueryStats>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_count: Option<u64>,
}

impl QueryResults {
    /// Get column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a row as a HashMap keyed by column name
    pub fn row_as_map(&self, row_idx: usize) -> Option<HashMap<String, JsonValue>> {
        let row = self.rows.get(row_idx)?;
        let mut map = HashMap::with_capacity(self.columns.len());
        for (i, column) in self.columns.iter().enumerate() {
            if let Some(value) = row.get(i) {
                map.insert(column.name.clone(), value.clone());
            }
        }
        Some(map)
    }
}
