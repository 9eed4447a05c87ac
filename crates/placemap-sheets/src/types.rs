//! Sheets API types.

use serde::Deserialize;
use serde_json::Value;

/// One spreadsheet row as text cells; trailing empty cells may be missing.
pub type Row = Vec<String>;

/// How the API renders cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRenderOption {
    FormattedValue,
    Formula,
}

impl ValueRenderOption {
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::FormattedValue => "FORMATTED_VALUE",
            Self::Formula => "FORMULA",
        }
    }
}

/// API response for `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Omitted by the API when the range is empty
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Rows with every cell rendered as text.
    pub fn into_rows(self) -> Vec<Row> {
        self.values
            .into_iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect()
    }
}

/// Formula render mode returns numbers and booleans unquoted.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
