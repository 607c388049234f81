/// Database configuration and connection management
pub mod database;

/// PTA settings loading from config.toml
pub mod pta;

pub use pta::{LinkPolicy, PtaConfig};
