//! Store contracts the watcher and ingestion service are written against.
//!
//! Every write commits before it returns; callers treat a returned id as
//! durable. [`DbStore`] is the sea-orm backed implementation used in
//! production and in tests against in-memory SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};

use crate::models::metric_snapshot::{self, MetricReadings};
use crate::models::notification::{self, NewNotification};
use crate::models::{monitored_system, prediction_record, watcher_cursor};

#[async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn append_snapshot(
        &self,
        system_id: i64,
        readings: &MetricReadings,
        captured_at: DateTime<Utc>,
    ) -> Result<i64, DbErr>;

    async fn append_prediction(
        &self,
        system_id: i64,
        probability: Option<f64>,
        downtime_risk: bool,
        estimated_time_to_downtime: Option<i32>,
    ) -> Result<i64, DbErr>;

    /// Predictions with id strictly greater than `last_id`, ascending.
    async fn list_predictions_since(
        &self,
        last_id: i64,
        limit: u64,
    ) -> Result<Vec<prediction_record::Model>, DbErr>;

    async fn get_system(&self, system_id: i64)
    -> Result<Option<monitored_system::Model>, DbErr>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn find_by_system_and_key(
        &self,
        system_id: i64,
        dedup_key: &str,
    ) -> Result<Option<notification::Model>, DbErr>;

    async fn find_by_system_and_message(
        &self,
        system_id: i64,
        message: &str,
    ) -> Result<Option<notification::Model>, DbErr>;

    /// `None` means a notification with the same key already existed.
    async fn insert_if_absent(
        &self,
        new: &NewNotification,
    ) -> Result<Option<notification::Model>, DbErr>;

    async fn list_unread(&self, system_id: i64) -> Result<Vec<notification::Model>, DbErr>;

    async fn mark_read(&self, ids: &[i64]) -> Result<u64, DbErr>;

    /// Atomic fetch-and-mark-read. A row is handed to at most one caller.
    async fn take_unread(&self, system_id: i64) -> Result<Vec<notification::Model>, DbErr>;
}

#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn load_cursor(&self, name: &str) -> Result<i64, DbErr>;

    /// Returns the value now stored, which is never lower than before.
    async fn save_cursor(&self, name: &str, last_seen_id: i64) -> Result<i64, DbErr>;
}

#[derive(Clone)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl TelemetryStore for DbStore {
    async fn append_snapshot(
        &self,
        system_id: i64,
        readings: &MetricReadings,
        captured_at: DateTime<Utc>,
    ) -> Result<i64, DbErr> {
        metric_snapshot::Model::create(&self.db, system_id, readings, captured_at)
            .await
            .map(|m| m.id)
    }

    async fn append_prediction(
        &self,
        system_id: i64,
        probability: Option<f64>,
        downtime_risk: bool,
        estimated_time_to_downtime: Option<i32>,
    ) -> Result<i64, DbErr> {
        prediction_record::Model::create(
            &self.db,
            system_id,
            probability,
            downtime_risk,
            estimated_time_to_downtime,
        )
        .await
        .map(|m| m.id)
    }

    async fn list_predictions_since(
        &self,
        last_id: i64,
        limit: u64,
    ) -> Result<Vec<prediction_record::Model>, DbErr> {
        prediction_record::Model::list_since(&self.db, last_id, limit).await
    }

    async fn get_system(
        &self,
        system_id: i64,
    ) -> Result<Option<monitored_system::Model>, DbErr> {
        use sea_orm::EntityTrait;
        monitored_system::Entity::find_by_id(system_id)
            .one(&self.db)
            .await
    }
}

#[async_trait]
impl NotificationStore for DbStore {
    async fn find_by_system_and_key(
        &self,
        system_id: i64,
        dedup_key: &str,
    ) -> Result<Option<notification::Model>, DbErr> {
        notification::Model::find_by_system_and_key(&self.db, system_id, dedup_key).await
    }

    async fn find_by_system_and_message(
        &self,
        system_id: i64,
        message: &str,
    ) -> Result<Option<notification::Model>, DbErr> {
        notification::Model::find_by_system_and_message(&self.db, system_id, message).await
    }

    async fn insert_if_absent(
        &self,
        new: &NewNotification,
    ) -> Result<Option<notification::Model>, DbErr> {
        notification::Model::insert_if_absent(&self.db, new).await
    }

    async fn list_unread(&self, system_id: i64) -> Result<Vec<notification::Model>, DbErr> {
        notification::Model::list_unread(&self.db, system_id).await
    }

    async fn mark_read(&self, ids: &[i64]) -> Result<u64, DbErr> {
        notification::Model::mark_read(&self.db, ids).await
    }

    async fn take_unread(&self, system_id: i64) -> Result<Vec<notification::Model>, DbErr> {
        notification::Model::take_unread(&self.db, system_id).await
    }
}

#[async_trait]
impl CursorStore for DbStore {
    async fn load_cursor(&self, name: &str) -> Result<i64, DbErr> {
        watcher_cursor::Model::load(&self.db, name).await
    }

    async fn save_cursor(&self, name: &str, last_seen_id: i64) -> Result<i64, DbErr> {
        watcher_cursor::Model::save(&self.db, name, last_seen_id).await
    }
}
