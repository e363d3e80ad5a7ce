pub mod db;
pub mod time;
pub mod tracing;
