pub mod delivery;
pub mod ingest;
pub mod scoring;
pub mod watcher;
