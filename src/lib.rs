pub mod backend;
pub mod calendar;
pub mod config;
pub mod display;
pub mod error;
pub mod matrix;
pub mod model;
pub mod orchestrator;
pub mod web;

pub use error::{Result, ScheduleError};
pub use orchestrator::{GenerateOptions, Phase, ScheduleData};
