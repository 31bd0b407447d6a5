pub use sea_orm_migration::prelude::*;

mod m20211001_000001_create_landreg_price;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20211001_000001_create_landreg_price::Migration)]
    }
}
