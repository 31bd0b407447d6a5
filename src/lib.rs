// src/lib.rs

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::services::price_table::PriceTable;

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<dyn PriceTable>,
    pub config: Arc<AppConfig>,
}

pub mod entities {
    pub mod prelude;
    pub mod landreg_price;
}

pub mod services {
    pub mod csv;
    pub mod pagination;
    pub mod price_mapper;
    pub mod price_query;
    pub mod price_table;
    pub mod range_query;
}

pub mod config;
pub mod error;
pub mod models;
pub mod handlers;

/// All routes of the price API.
pub fn build_router(state: AppState) -> Router {
    use crate::handlers::prices;

    Router::new()
        .route("/", get(hello_landreg))
        .route("/postcode/scan/{prefix}", get(prices::get_prices_by_scan))
        .route("/postcode/{postcode}", get(prices::get_prices_by_postcode))
        .route("/postcode/{postcode}/{format}", get(prices::get_prices_formatted))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn hello_landreg() -> &'static str {
    "Land Registry price service"
}
