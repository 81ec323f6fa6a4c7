pub mod m202510010001_create_accounts;
pub mod m202510010002_create_monitored_systems;
pub mod m202510010003_create_metric_snapshots;
pub mod m202510010004_create_prediction_records;
pub mod m202510010005_create_notifications;
pub mod m202510010006_create_watcher_cursors;
