use std::sync::Arc;

use axum::{Router, body::Body, http::Response};
use http_body_util::BodyExt;
use landreg_prices::{
    AppState, build_router,
    config::{AppConfig, QueryLimits},
    entities::landreg_price,
    services::price_table::MemoryPriceTable,
};

/// Config for tests; the database URL is never dialled
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgresql://landreg_user@localhost:5432/landreg_test".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        run_migrations: false,
        lookup: QueryLimits::LOOKUP,
        scan: QueryLimits::SCAN,
        export: QueryLimits::EXPORT,
    }
}

pub fn price_row(postcode: &str, address: &str, prices: &str) -> landreg_price::Model {
    landreg_price::Model {
        partition_key: postcode.split(' ').next().unwrap_or_default().to_uppercase(),
        row_key: postcode.to_uppercase(),
        prices: prices.to_string(),
        postcode: postcode.to_string(),
        address: address.to_string(),
        locality: "Westminster".to_string(),
        town: "London".to_string(),
        district: "City of Westminster".to_string(),
        county: "Greater London".to_string(),
        timestamp: None,
        etag: None,
    }
}

/// Table with a handful of SW1A rows and one row in a neighbouring partition
pub fn seeded_table() -> MemoryPriceTable {
    let table = MemoryPriceTable::new();
    table.insert(price_row(
        "SW1A 1AA",
        "Buckingham Palace",
        "2021-05-01~250000,2022-01-10~265000",
    ));
    table.insert(price_row("SW1A 1AB", "2 The Mall", "2019-11-11~410000"));
    table.insert(price_row("SW1A 2AA", "10 Downing Street", "2020-06-30~995000"));
    table.insert(price_row("SW1B 1AA", "1 Other Road", "2020-01-01~100000"));
    table
}

pub fn build_test_router(table: MemoryPriceTable, config: AppConfig) -> Router {
    build_router(AppState {
        table: Arc::new(table),
        config: Arc::new(config),
    })
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
