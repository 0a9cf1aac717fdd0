//! Canonical row model and response normalization.
//!
//! The table service (and the SDK layers that have sat in front of it) return the
//! same logical row in several shapes: the row itself keyed by its identifier, the
//! row wrapped under `row`/`rows`/`items`/`data`, or a flat legacy mapping of
//! column name to scalar. Cells vary too: a bare string, a `{"value": ..}` wrapper,
//! or a raw completion-choice object. [`normalize`] is the single boundary where
//! all of that collapses into [`Row`]; nothing downstream inspects raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Column names that carry a row's identifier, in lookup order.
pub const ROW_ID_KEYS: [&str; 3] = ["ID", "row_id", "id"];

/// Fields that may wrap the actual row, in priority order.
const WRAPPER_KEYS: [&str; 4] = ["row", "rows", "items", "data"];

/// Wrapping depth after which a payload is treated as carrying no row.
const MAX_WRAPPER_DEPTH: usize = 4;

/// A single column value after one level of unwrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// Non-empty trimmed text, if any.
    pub fn text(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Collapse one wire cell into its value.
    ///
    /// Recognises a bare scalar, `{"value": ..}`, `{"text": ..}` and a completion
    /// object `{"choices": [{"message": {"content": ..}}]}` / `{"choices": [{"text": ..}]}`.
    /// Exactly one wrapper level is removed; a wrapper around another wrapper
    /// yields no value.
    pub fn from_wire(raw: &Value) -> Self {
        let value = match raw {
            Value::Object(map) => {
                if let Some(inner) = map.get("value") {
                    scalar_text(inner)
                } else if let Some(inner) = map.get("text") {
                    scalar_text(inner)
                } else if let Some(choices) = map.get("choices") {
                    completion_text(choices)
                } else {
                    None
                }
            }
            other => scalar_text(other),
        };
        Self { value }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn completion_text(choices: &Value) -> Option<String> {
    let first = choices.as_array()?.first()?;
    first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| first.get("text").and_then(Value::as_str))
        .map(str::to_string)
}

/// True when `value` reads as one cell rather than a nested row container.
fn is_cell_shaped(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key("value") || map.contains_key("text") || map.contains_key("choices")
        }
        Value::Array(_) => false,
        _ => true,
    }
}

/// Normalized row: column name to cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub columns: BTreeMap<String, Cell>,
}

impl Row {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns.get(column)
    }

    /// Non-empty trimmed text of `column`.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Cell::text)
    }

    /// The row's identifier, taken from the first populated id column.
    pub fn row_id(&self) -> Option<&str> {
        ROW_ID_KEYS.iter().find_map(|key| self.text(key))
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        self.columns.insert(column.into(), cell);
    }

    fn from_cells<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> Self {
        let columns = entries
            .map(|(name, raw)| (name.clone(), Cell::from_wire(raw)))
            .collect();
        Self { columns }
    }
}

/// Classified raw payload, before any column extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse<'a> {
    /// The payload is itself the row: it carries an identifier column.
    BareRecord(&'a Map<String, Value>),
    /// The row sits under a wrapper field; holds the unwrapped payload.
    Wrapped(&'a Value),
    /// A flat mapping of column to scalar or cell.
    Legacy(&'a Map<String, Value>),
    /// Nothing resembling a row.
    Empty,
}

impl<'a> RawResponse<'a> {
    pub fn classify(raw: &'a Value) -> Self {
        let map = match raw {
            Value::Object(map) if !map.is_empty() => map,
            Value::Array(items) => {
                return match items.first() {
                    Some(first) => RawResponse::Wrapped(first),
                    None => RawResponse::Empty,
                }
            }
            _ => return RawResponse::Empty,
        };

        if ROW_ID_KEYS.iter().any(|k| map.contains_key(*k)) {
            return RawResponse::BareRecord(map);
        }

        for key in WRAPPER_KEYS {
            if let Some(inner) = map.get(key) {
                if is_cell_shaped(inner) {
                    continue;
                }
                return match inner {
                    Value::Array(items) => match items.first() {
                        Some(first) => RawResponse::Wrapped(first),
                        None => RawResponse::Empty,
                    },
                    other => RawResponse::Wrapped(other),
                };
            }
        }

        RawResponse::Legacy(map)
    }

    fn into_row(self, depth: usize) -> Row {
        match self {
            RawResponse::BareRecord(map) => {
                let mut row = Row::from_cells(
                    map.iter()
                        .filter(|(k, v)| !(k.as_str() == "columns" && !is_cell_shaped(v))),
                );
                if let Some(Value::Object(columns)) = map.get("columns") {
                    if columns_look_like_row(columns) {
                        row.columns.extend(Row::from_cells(columns.iter()).columns);
                    }
                }
                row
            }
            RawResponse::Wrapped(inner) if depth < MAX_WRAPPER_DEPTH => {
                RawResponse::classify(inner).into_row(depth + 1)
            }
            RawResponse::Wrapped(_) | RawResponse::Empty => Row::default(),
            RawResponse::Legacy(map) => {
                if let Some(Value::Object(columns)) = map.get("columns") {
                    if columns_look_like_row(columns) {
                        return Row::from_cells(columns.iter());
                    }
                }
                Row::from_cells(map.iter())
            }
        }
    }
}

fn columns_look_like_row(columns: &Map<String, Value>) -> bool {
    !columns.contains_key("value") && !columns.contains_key("text") && !columns.contains_key("choices")
}

/// Convert any response payload into the canonical [`Row`].
///
/// Never fails: a payload with no locatable row data yields an empty row, which
/// callers read as "not ready yet". Idempotent over serialized rows.
pub fn normalize(raw: &Value) -> Row {
    RawResponse::classify(raw).into_row(0)
}
