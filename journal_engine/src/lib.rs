pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod csv_io;
pub mod models;
pub mod store;

pub use models::*;
