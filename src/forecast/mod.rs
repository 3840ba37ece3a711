pub mod aggregate;
pub mod client;
pub mod error;
pub mod series;
