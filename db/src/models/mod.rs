pub mod account;
pub mod metric_snapshot;
pub mod monitored_system;
pub mod notification;
pub mod prediction_record;
pub mod watcher_cursor;

pub use account::Entity as Account;
pub use metric_snapshot::Entity as MetricSnapshot;
pub use monitored_system::Entity as MonitoredSystem;
pub use notification::Entity as Notification;
pub use prediction_record::Entity as PredictionRecord;
pub use watcher_cursor::Entity as WatcherCursor;
