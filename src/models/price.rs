use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::landreg_price;
use crate::error::PriceError;
use crate::services::price_mapper::parse_prices;

/// One `date~price` pair unpacked from a stored row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePoint {
    pub date: String,
    pub price: i64,
}

/// A stored row with its packed prices already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRow {
    pub partition_key: String,
    pub row_key: String,
    pub prices: Vec<PricePoint>,
    pub postcode: String,
    pub address: String,
    pub locality: String,
    pub town: String,
    pub district: String,
    pub county: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub etag: Option<String>,
}

impl TryFrom<landreg_price::Model> for PriceRow {
    type Error = PriceError;

    fn try_from(model: landreg_price::Model) -> Result<Self, Self::Error> {
        let prices = parse_prices(&model.prices)
            .map_err(|reason| PriceError::format(&model.row_key, reason))?;

        Ok(PriceRow {
            partition_key: model.partition_key,
            row_key: model.row_key,
            prices,
            postcode: model.postcode,
            address: model.address,
            locality: model.locality,
            town: model.town,
            district: model.district,
            county: model.county,
            timestamp: model.timestamp,
            etag: model.etag,
        })
    }
}

/// Flat price record returned to clients, one per transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub postcode: String,
    pub address: String,
    pub date: String,
    pub price: i64,
    pub locality: String,
}

/// Response body format selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFormat {
    #[default]
    Json,
    Csv,
}

impl ResultFormat {
    /// `CSV` in any case selects CSV; anything else falls back to JSON.
    pub fn parse(format: Option<&str>) -> Self {
        match format {
            Some(f) if f.trim().eq_ignore_ascii_case("csv") => ResultFormat::Csv,
            _ => ResultFormat::Json,
        }
    }
}

/// Query parameters for GET /postcode/scan/{prefix}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanQuery {
    pub format: Option<String>, // "CSV" or JSON by default
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
