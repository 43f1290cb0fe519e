pub mod config;
pub mod error;
pub mod models;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use models::Record;
pub use tracker::{Capability, TrackerClient};
