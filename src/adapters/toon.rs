//! TOON codec backed by `serde_toon`.
//!
//! TOON writes uniform arrays of objects as a header plus one delimited row
//! per element:
//!
//! ```text
//! users[2]{id,name}:
//!   1,Alice
//!   2,Bob
//! ```
//!
//! Nesting is bounded on both sides: records deeper than `max_depth` are
//! rejected before encoding, and documents indented past it are rejected
//! before they reach the parser.

use crate::domain::model::{StructuredRecord, COMPACT_FORMAT};
use crate::domain::ports::CompactCodec;
use crate::utils::error::{Result, SavingsError};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const DEFAULT_MAX_DEPTH: usize = 64;

const INDENT_WIDTH: usize = 2;

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bline:?\s*(\d+)").expect("Invalid regex"));

#[derive(Debug, Clone)]
pub struct ToonCodec {
    max_depth: usize,
}

impl ToonCodec {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn check_record_depth(&self, record: &StructuredRecord) -> Result<()> {
        if nesting_depth(record) > self.max_depth {
            return Err(SavingsError::encoding(format!(
                "nesting depth exceeds the limit of {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// 逐行檢查縮排深度，避免解析器遞迴過深
    fn check_document_depth(&self, text: &str) -> Result<()> {
        for (index, line) in text.lines().enumerate() {
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            if line.trim().is_empty() {
                continue;
            }
            if indent / INDENT_WIDTH >= self.max_depth {
                return Err(SavingsError::decoding(
                    index + 1,
                    format!("nesting depth exceeds the limit of {}", self.max_depth),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ToonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactCodec for ToonCodec {
    fn format_name(&self) -> &str {
        COMPACT_FORMAT
    }

    fn encode(&self, record: &StructuredRecord) -> Result<String> {
        self.check_record_depth(record)?;
        serde_toon::to_string_pretty(record).map_err(|e| SavingsError::encoding(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<StructuredRecord> {
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        self.check_document_depth(text)?;

        serde_toon::from_str::<Value>(text).map_err(|e| {
            let message = e.to_string();
            SavingsError::decoding(error_line(&message), message)
        })
    }
}

/// Number of nested containers, counting the root. Scalars are depth 0.
fn nesting_depth(record: &Value) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(record, 0usize)];

    while let Some((value, depth)) = pending.pop() {
        match value {
            Value::Object(map) => pending.extend(map.values().map(|child| (child, depth + 1))),
            Value::Array(items) => pending.extend(items.iter().map(|child| (child, depth + 1))),
            _ => continue,
        }
        deepest = deepest.max(depth + 1);
    }

    deepest
}

/// Line reported by the parser, or 0 when its message carries none.
fn error_line(message: &str) -> usize {
    ERROR_LINE
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}
