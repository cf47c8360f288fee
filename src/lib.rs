pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod tools;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ExaClient, ExaClientConfig, LocalStorage};
pub use config::TomlConfig;
pub use crate::core::{engine::PrepEngine, pipeline::MeetingPrepPipeline, MeetingRequest};
pub use server::{ApiServer, ApiServerConfig, AppState};
pub use utils::error::{PrepError, Result};
