pub mod client;
pub mod cycle;
pub mod source;
