pub mod admin;
pub mod clock;
pub mod config;
pub mod error;
pub mod hostel;
pub mod telemetry;
