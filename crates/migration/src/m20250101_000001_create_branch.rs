//! Create `branch` table.
//! One row per branch document; holidays are an embedded jsonb array.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Branch::Table)
                    .if_not_exists()
                    .col(string_len(Branch::Id, 64).primary_key())
                    .col(string_len(Branch::EmailAddress, 320).not_null())
                    .col(string_len(Branch::Name, 256).not_null())
                    .col(string_len(Branch::PhoneNumber, 64).not_null())
                    .col(string_len(Branch::State, 16).not_null())
                    .col(timestamp_with_time_zone(Branch::CreationDate).not_null())
                    .col(timestamp_with_time_zone(Branch::LastModifiedDate).not_null())
                    .col(json_binary(Branch::BranchHolidays).not_null().default(Expr::cust("'[]'::jsonb")))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_branch_state")
                    .table(Branch::Table)
                    .col(Branch::State)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Branch::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Branch {
    Table,
    Id,
    EmailAddress,
    Name,
    PhoneNumber,
    State,
    CreationDate,
    LastModifiedDate,
    BranchHolidays,
}
