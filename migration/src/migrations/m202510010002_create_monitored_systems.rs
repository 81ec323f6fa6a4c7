use sea_orm_migration::prelude::*;

use super::m202510010001_create_accounts::Accounts;

#[derive(DeriveIden)]
pub enum MonitoredSystems {
    Table,
    Id,
    AccountId,
    SystemName,
    Location,
    IpAddress,
    RegisteredAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010002_create_monitored_systems"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonitoredSystems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoredSystems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonitoredSystems::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(MonitoredSystems::SystemName).string().not_null())
                    .col(ColumnDef::new(MonitoredSystems::Location).string())
                    .col(ColumnDef::new(MonitoredSystems::IpAddress).string())
                    .col(
                        ColumnDef::new(MonitoredSystems::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MonitoredSystems::Table, MonitoredSystems::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_monitored_systems_account")
                    .table(MonitoredSystems::Table)
                    .col(MonitoredSystems::AccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonitoredSystems::Table).to_owned())
            .await
    }
}
