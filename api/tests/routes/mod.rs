mod accounts_test;
mod health_test;
mod notifications_test;
mod systems_test;
mod telemetry_test;
