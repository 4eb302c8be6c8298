pub mod agenda;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod recency;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
pub use store::{MemoryStore, Repository};
