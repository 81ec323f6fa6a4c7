use sea_orm_migration::prelude::*;

use super::m202510010001_create_accounts::Accounts;
use super::m202510010002_create_monitored_systems::MonitoredSystems;

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    AccountId,
    SystemId,
    Message,
    DedupKey,
    RiskLevel,
    Status,
    SentTime,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010005_create_notifications"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::SystemId).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::DedupKey).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::RiskLevel)
                            .string_len(16)
                            .not_null()
                            .default("Low"),
                    )
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string_len(16)
                            .not_null()
                            .default("Unread"),
                    )
                    .col(
                        ColumnDef::new(Notifications::SentTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::SystemId)
                            .to(MonitoredSystems::Table, MonitoredSystems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One notification per alert key and system; the watcher inserts with
        // ON CONFLICT DO NOTHING against this index.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_system_dedup")
                    .table(Notifications::Table)
                    .col(Notifications::SystemId)
                    .col(Notifications::DedupKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_system_status")
                    .table(Notifications::Table)
                    .col(Notifications::SystemId)
                    .col(Notifications::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}
