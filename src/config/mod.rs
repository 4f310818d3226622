pub mod env;
pub mod manifest;

pub use env::EnvConfig;
pub use manifest::{ActionConfig, GatewayManifest, RepoConfig, WorkflowConfig};
