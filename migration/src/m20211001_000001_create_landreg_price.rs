use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per postcode, partitioned by outward code
        manager
            .create_table(
                Table::create()
                    .table(LandregPrice::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LandregPrice::PartitionKey)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LandregPrice::RowKey)
                            .string_len(16)
                            .not_null()
                            // Range scans compare row keys by code point
                            .extra("COLLATE \"C\""),
                    )
                    .col(ColumnDef::new(LandregPrice::Prices).text().not_null())
                    .col(ColumnDef::new(LandregPrice::Postcode).string().not_null())
                    .col(ColumnDef::new(LandregPrice::Address).string().not_null())
                    .col(ColumnDef::new(LandregPrice::Locality).string().not_null())
                    .col(ColumnDef::new(LandregPrice::Town).string().not_null())
                    .col(ColumnDef::new(LandregPrice::District).string().not_null())
                    .col(ColumnDef::new(LandregPrice::County).string().not_null())
                    .col(
                        ColumnDef::new(LandregPrice::Timestamp)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(LandregPrice::Etag).string().null())
                    .primary_key(
                        Index::create()
                            .col(LandregPrice::PartitionKey)
                            .col(LandregPrice::RowKey),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LandregPrice::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LandregPrice {
    Table,
    PartitionKey,
    RowKey,
    Prices,
    Postcode,
    Address,
    Locality,
    Town,
    District,
    County,
    Timestamp,
    Etag,
}
