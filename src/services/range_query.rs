//! Key queries against the price table.
//!
//! Rows are partitioned by outward postcode (`"SW1A"`) and keyed by the full
//! uppercased postcode (`"SW1A 1AA"`). A prefix scan selects every row key in
//! `[prefix, successor(prefix))` within one partition.

use std::fmt;

use crate::error::{PriceError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery {
    /// `PartitionKey == partition_key && RowKey == row_key`
    Exact {
        partition_key: String,
        row_key: String,
    },
    /// `PartitionKey == partition_key && start <= RowKey < end`
    Range {
        partition_key: String,
        start: String,
        end: String,
    },
}

impl KeyQuery {
    /// Exact lookup of one full postcode.
    pub fn exact(postcode: &str) -> Result<Self> {
        let partition_key = outward_code(postcode)?;
        Ok(KeyQuery::Exact {
            partition_key,
            row_key: postcode.to_uppercase(),
        })
    }

    /// Range scan of every postcode starting with `prefix`.
    ///
    /// `prefix` must contain at least the complete outward code.
    pub fn prefix_scan(prefix: &str) -> Result<Self> {
        let partition_key = outward_code(prefix)?;
        let start = prefix.to_uppercase();
        let end = successor(&start)?;
        Ok(KeyQuery::Range {
            partition_key,
            start,
            end,
        })
    }

    pub fn partition_key(&self) -> &str {
        match self {
            KeyQuery::Exact { partition_key, .. } | KeyQuery::Range { partition_key, .. } => {
                partition_key
            }
        }
    }

    pub fn matches(&self, partition_key: &str, row_key: &str) -> bool {
        match self {
            KeyQuery::Exact {
                partition_key: pk,
                row_key: rk,
            } => pk == partition_key && rk == row_key,
            KeyQuery::Range {
                partition_key: pk,
                start,
                end,
            } => pk == partition_key && row_key >= start.as_str() && row_key < end.as_str(),
        }
    }

    /// OData filter form of the query, as table services expect it.
    pub fn odata_filter(&self) -> String {
        match self {
            KeyQuery::Exact {
                partition_key,
                row_key,
            } => format!(
                "(PartitionKey eq {}) and (RowKey eq {})",
                odata_literal(partition_key),
                odata_literal(row_key)
            ),
            KeyQuery::Range {
                partition_key,
                start,
                end,
            } => format!(
                "(PartitionKey eq {}) and ((RowKey ge {}) and (RowKey lt {}))",
                odata_literal(partition_key),
                odata_literal(start),
                odata_literal(end)
            ),
        }
    }
}

impl fmt::Display for KeyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.odata_filter())
    }
}

/// Segment before the first space, uppercased.
fn outward_code(postcode: &str) -> Result<String> {
    if postcode.is_empty() {
        return Err(PriceError::invalid_argument("postcode must not be empty"));
    }

    let outward = postcode.split(' ').next().unwrap_or_default();
    if outward.is_empty() {
        return Err(PriceError::invalid_argument(format!(
            "postcode {postcode:?} must start with an outward code"
        )));
    }

    Ok(outward.to_uppercase())
}

/// Replace the final character with the next code point.
fn successor(key: &str) -> Result<String> {
    let mut chars = key.chars();
    let last = chars
        .next_back()
        .ok_or_else(|| PriceError::invalid_argument("scan prefix must not be empty"))?;

    let next = char::from_u32(last as u32 + 1).ok_or_else(|| {
        PriceError::invalid_argument(format!("scan prefix {key:?} has no upper bound"))
    })?;

    let mut end = chars.as_str().to_string();
    end.push(next);
    Ok(end)
}

fn odata_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
