use sea_orm_migration::prelude::*;

use super::m202510010002_create_monitored_systems::MonitoredSystems;

#[derive(DeriveIden)]
enum PredictionRecords {
    Table,
    Id,
    SystemId,
    Probability,
    DowntimeRisk,
    EstimatedTimeToDowntime,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010004_create_prediction_records"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PredictionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PredictionRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PredictionRecords::SystemId).big_integer().not_null())
                    // NULL when the scorer produced nothing usable
                    .col(ColumnDef::new(PredictionRecords::Probability).double())
                    .col(ColumnDef::new(PredictionRecords::DowntimeRisk).boolean().not_null())
                    .col(ColumnDef::new(PredictionRecords::EstimatedTimeToDowntime).integer())
                    .col(
                        ColumnDef::new(PredictionRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PredictionRecords::Table, PredictionRecords::SystemId)
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
                    .name("idx_prediction_records_system")
                    .table(PredictionRecords::Table)
                    .col(PredictionRecords::SystemId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PredictionRecords::Table).to_owned())
            .await
    }
}
