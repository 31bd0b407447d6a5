//! Access to the partitioned price table.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityName, EntityTrait, Paginator,
    PaginatorTrait, QueryFilter, QueryOrder, SelectModel,
};

use crate::entities::{landreg_price, prelude::LandregPrice};
use crate::error::Result;
use crate::models::price::PriceRow;
use crate::services::pagination::{Cancellation, PageSource};
use crate::services::range_query::KeyQuery;

/// A table of price rows keyed by `(partition_key, row_key)`.
pub trait PriceTable: Send + Sync {
    /// Table name, used in responses and logs.
    fn name(&self) -> &str;

    /// Lazy page cursor over the rows matching `query`.
    fn query<'a>(&'a self, query: &KeyQuery, page_size: u64) -> Box<dyn PageSource + 'a>;
}

fn key_condition(query: &KeyQuery) -> Condition {
    match query {
        KeyQuery::Exact {
            partition_key,
            row_key,
        } => Condition::all()
            .add(landreg_price::Column::PartitionKey.eq(partition_key.as_str()))
            .add(landreg_price::Column::RowKey.eq(row_key.as_str())),
        KeyQuery::Range {
            partition_key,
            start,
            end,
        } => Condition::all()
            .add(landreg_price::Column::PartitionKey.eq(partition_key.as_str()))
            .add(landreg_price::Column::RowKey.gte(start.as_str()))
            .add(landreg_price::Column::RowKey.lt(end.as_str())),
    }
}

/// PostgreSQL-backed table via SeaORM.
pub struct SeaOrmPriceTable {
    db: DatabaseConnection,
    name: String,
}

impl SeaOrmPriceTable {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            name: LandregPrice.table_name().to_string(),
        }
    }
}

impl PriceTable for SeaOrmPriceTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn query<'a>(&'a self, query: &KeyQuery, page_size: u64) -> Box<dyn PageSource + 'a> {
        // Same ordering a partitioned table service returns: partition, then row key
        let paginator = LandregPrice::find()
            .filter(key_condition(query))
            .order_by_asc(landreg_price::Column::PartitionKey)
            .order_by_asc(landreg_price::Column::RowKey)
            .paginate(&self.db, page_size);

        Box::new(SeaOrmPages { paginator })
    }
}

struct SeaOrmPages<'db> {
    paginator: Paginator<'db, DatabaseConnection, SelectModel<landreg_price::Model>>,
}

#[async_trait]
impl PageSource for SeaOrmPages<'_> {
    async fn next_page(&mut self, _cancel: &Cancellation) -> Result<Option<Vec<PriceRow>>> {
        let Some(models) = self.paginator.fetch_and_next().await? else {
            return Ok(None);
        };

        models
            .into_iter()
            .map(PriceRow::try_from)
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

/// In-process table for tests.
#[derive(Clone)]
pub struct MemoryPriceTable {
    name: String,
    rows: Arc<RwLock<BTreeMap<(String, String), landreg_price::Model>>>,
    pages_served: Arc<AtomicUsize>,
}

impl Default for MemoryPriceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPriceTable {
    pub fn new() -> Self {
        Self {
            name: LandregPrice.table_name().to_string(),
            rows: Arc::default(),
            pages_served: Arc::default(),
        }
    }

    pub fn insert(&self, row: landreg_price::Model) {
        let key = (row.partition_key.clone(), row.row_key.clone());
        self.rows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, row);
    }

    /// Total pages handed out across all queries.
    pub fn pages_served(&self) -> usize {
        self.pages_served.load(Ordering::SeqCst)
    }
}

impl PriceTable for MemoryPriceTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn query<'a>(&'a self, query: &KeyQuery, page_size: u64) -> Box<dyn PageSource + 'a> {
        let rows = self.rows.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let matched: Vec<landreg_price::Model> = rows
            .iter()
            .filter(|((pk, rk), _)| query.matches(pk, rk))
            .map(|(_, row)| row.clone())
            .collect();

        let page_size = usize::try_from(page_size).unwrap_or(usize::MAX).max(1);
        let mut pages: Vec<Vec<landreg_price::Model>> =
            matched.chunks(page_size).map(<[_]>::to_vec).collect();
        pages.reverse();

        Box::new(MemoryPages {
            pages,
            pages_served: self.pages_served.clone(),
        })
    }
}

struct MemoryPages {
    /// Remaining pages, last page first
    pages: Vec<Vec<landreg_price::Model>>,
    pages_served: Arc<AtomicUsize>,
}

#[async_trait]
impl PageSource for MemoryPages {
    async fn next_page(&mut self, _cancel: &Cancellation) -> Result<Option<Vec<PriceRow>>> {
        let Some(models) = self.pages.pop() else {
            return Ok(None);
        };
        self.pages_served.fetch_add(1, Ordering::SeqCst);

        models
            .into_iter()
            .map(PriceRow::try_from)
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}
