// Adapters layer: concrete implementations for external systems (search API, storage).

pub mod exa;
pub mod storage;

pub use exa::{ExaClient, ExaClientConfig};
pub use storage::LocalStorage;
