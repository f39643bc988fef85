//! Common utilities and types shared across cumulus

pub mod config;
pub mod error;
pub mod metrics;

pub use config::WriteConfig;
pub use error::{Error, Result};
pub use metrics::{Counter, CounterMap, MetricsRegistry, METRICS};
