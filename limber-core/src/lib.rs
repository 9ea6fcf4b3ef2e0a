pub mod config;
pub mod error;
pub mod exercise;
pub mod landmarks;
pub mod logging;
pub mod session;

pub use error::{LimberError, Result};
