//! `SeaORM` Entity for landreg_price table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "landreg_price")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub partition_key: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub row_key: String,
    #[sea_orm(column_type = "Text")]
    pub prices: String,
    pub postcode: String,
    pub address: String,
    pub locality: String,
    pub town: String,
    pub district: String,
    pub county: String,
    pub timestamp: Option<DateTimeWithTimeZone>,
    pub etag: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
