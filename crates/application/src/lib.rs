//! Application layer - Experiment orchestration
//!
//! Contains the experiment scheduler, observation capture, and the port the
//! infrastructure fault injector implements.

pub mod error;
pub mod ports;
pub mod services;

pub use error::SchedulerError;
pub use ports::*;
pub use services::*;
