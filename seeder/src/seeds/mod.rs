pub mod account;
pub mod system;
pub mod telemetry;
