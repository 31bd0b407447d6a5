//! The two price queries the API serves: exact postcode lookup and prefix scan.

use crate::config::QueryLimits;
use crate::error::Result;
use crate::models::price::PriceRecord;
use crate::services::pagination::{Cancellation, collect_price_pages};
use crate::services::price_table::PriceTable;
use crate::services::range_query::KeyQuery;

/// Price records for one full postcode.
pub async fn lookup_postcode(
    table: &dyn PriceTable,
    postcode: &str,
    limits: QueryLimits,
    cancel: &Cancellation,
) -> Result<Vec<PriceRecord>> {
    let query = KeyQuery::exact(postcode)?;
    run_query(table, &query, limits, cancel).await
}

/// Price records for every postcode starting with `prefix`.
pub async fn scan_prefix(
    table: &dyn PriceTable,
    prefix: &str,
    limits: QueryLimits,
    cancel: &Cancellation,
) -> Result<Vec<PriceRecord>> {
    let query = KeyQuery::prefix_scan(prefix)?;
    run_query(table, &query, limits, cancel).await
}

async fn run_query(
    table: &dyn PriceTable,
    query: &KeyQuery,
    limits: QueryLimits,
    cancel: &Cancellation,
) -> Result<Vec<PriceRecord>> {
    tracing::info!("Search Filter = {}", query);

    let mut pages = table.query(query, limits.page_size);
    let collected = collect_price_pages(&mut *pages, limits.max_pages, cancel).await?;

    Ok(collected.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::landreg_price;
    use crate::error::PriceError;
    use crate::services::price_table::MemoryPriceTable;

    fn seeded() -> MemoryPriceTable {
        let table = MemoryPriceTable::new();
        let rows = [
            ("CF10 1AA", "2018-04-20~160000,2021-08-02~182500"),
            ("CF10 1AB", "2019-12-12~210000"),
            ("CF10 2BB", "2020-10-10~99950"),
            ("CF11 1AA", "2022-03-03~300000"),
        ];
        for (postcode, prices) in rows {
            table.insert(landreg_price::Model {
                partition_key: postcode.split(' ').next().unwrap().to_string(),
                row_key: postcode.to_string(),
                prices: prices.to_string(),
                postcode: postcode.to_string(),
                address: format!("1 {postcode} Lane"),
                locality: "Cardiff".to_string(),
                town: "Cardiff".to_string(),
                district: "Cardiff".to_string(),
                county: "South Glamorgan".to_string(),
                timestamp: None,
                etag: None,
            });
        }
        table
    }

    #[tokio::test]
    async fn test_lookup_postcode() {
        let table = seeded();
        let records = lookup_postcode(&table, "cf10 1aa", QueryLimits::LOOKUP, &Cancellation::never())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.postcode == "CF10 1AA"));
        assert_eq!(records[1].price, 182500);
    }

    #[tokio::test]
    async fn test_lookup_missing_postcode_is_empty() {
        let table = seeded();
        let records = lookup_postcode(&table, "CF10 9ZZ", QueryLimits::LOOKUP, &Cancellation::never())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_scan_prefix_stays_in_partition() {
        let table = seeded();
        let records = scan_prefix(&table, "CF10", QueryLimits::SCAN, &Cancellation::never())
            .await
            .unwrap();

        let postcodes: Vec<&str> = records.iter().map(|r| r.postcode.as_str()).collect();
        assert_eq!(postcodes, vec!["CF10 1AA", "CF10 1AA", "CF10 1AB", "CF10 2BB"]);
    }

    #[tokio::test]
    async fn test_scan_prefix_truncates_at_page_limit() {
        let table = seeded();
        let limits = QueryLimits { page_size: 1, max_pages: 2 };
        let records = scan_prefix(&table, "CF10", limits, &Cancellation::never())
            .await
            .unwrap();

        // Two single-row pages: CF10 1AA (two prices) and CF10 1AB
        assert_eq!(records.len(), 3);
        assert_eq!(table.pages_served(), 2);
    }

    #[tokio::test]
    async fn test_empty_prefix_rejected_before_query() {
        let table = seeded();
        let err = scan_prefix(&table, "", QueryLimits::SCAN, &Cancellation::never())
            .await
            .unwrap_err();

        assert!(matches!(err, PriceError::InvalidArgument(_)));
        assert_eq!(table.pages_served(), 0);
    }
}
