//! Unpacks the `prices` column and expands rows into flat price records.
//!
//! A stored row packs every transaction for a postcode into one string of
//! `date~price` segments joined by commas, e.g.
//! `"2021-05-01~250000,2022-01-10~265000"`.

use crate::models::price::{PricePoint, PriceRecord, PriceRow};

const SEGMENT_SEPARATOR: char = ',';
const PAIR_SEPARATOR: char = '~';

/// Parse a packed prices string into ordered price points.
///
/// Returns the reason on failure; callers attach the row key.
pub fn parse_prices(packed: &str) -> Result<Vec<PricePoint>, String> {
    if packed.is_empty() {
        return Err("prices field is empty".to_string());
    }

    packed
        .split(SEGMENT_SEPARATOR)
        .map(|segment| {
            let mut parts = segment.split(PAIR_SEPARATOR);
            let (Some(date), Some(price_text), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(format!(
                    "segment {segment:?} must contain exactly one '{PAIR_SEPARATOR}'"
                ));
            };

            let price = price_text
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("price {price_text:?} in segment {segment:?}: {e}"))?;

            Ok(PricePoint {
                date: date.to_string(),
                price,
            })
        })
        .collect()
}

/// Expand one row into one record per price point, in source order.
pub fn flatten(row: &PriceRow) -> Vec<PriceRecord> {
    row.prices
        .iter()
        .map(|point| PriceRecord {
            postcode: row.postcode.clone(),
            address: row.address.clone(),
            date: point.date.clone(),
            price: point.price,
            locality: row.locality.clone(),
        })
        .collect()
}
