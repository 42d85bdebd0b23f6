//! Library side of the `roster` command: settings, logging, rendering,
//! CSV export, compliance reminders and demo seeding.

pub mod config;
pub mod export;
pub mod logging;
pub mod remind;
pub mod render;
pub mod seed;
