use sea_orm_migration::prelude::*;

use super::m202510010002_create_monitored_systems::MonitoredSystems;

#[derive(DeriveIden)]
enum MetricSnapshots {
    Table,
    Id,
    SystemId,
    CapturedAt,
    CpuUsage,
    MemoryUsage,
    DiskUsage,
    NetworkLatency,
    ErrorRate,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010003_create_metric_snapshots"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetricSnapshots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetricSnapshots::SystemId).big_integer().not_null())
                    .col(
                        ColumnDef::new(MetricSnapshots::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MetricSnapshots::CpuUsage).double().not_null())
                    .col(ColumnDef::new(MetricSnapshots::MemoryUsage).double().not_null())
                    .col(ColumnDef::new(MetricSnapshots::DiskUsage).double().not_null())
                    .col(ColumnDef::new(MetricSnapshots::NetworkLatency).double().not_null())
                    .col(ColumnDef::new(MetricSnapshots::ErrorRate).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(MetricSnapshots::Table, MetricSnapshots::SystemId)
                            .to(MonitoredSystems::Table, MonitoredSystems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metric_snapshots_system_captured")
                    .table(MetricSnapshots::Table)
                    .col(MetricSnapshots::SystemId)
                    .col(MetricSnapshots::CapturedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetricSnapshots::Table).to_owned())
            .await
    }
}
