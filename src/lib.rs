pub mod actor;
pub mod config;
pub mod error;
pub mod facade;
pub mod gateway;
pub mod presets;
pub mod registry;
pub mod transport;
pub mod trigger;
pub mod utils;

pub use actor::FlowActor;
pub use config::{ActionConfig, EnvConfig, GatewayManifest, RepoConfig, WorkflowConfig};
pub use error::{DispatchError, RegistryKind, Result};
pub use facade::{DispatchFacade, DynFlowFacade, FlowFacade};
pub use gateway::Gateway;
pub use registry::{RepoEntry, RepositoryRegistry};
#[cfg(feature = "http-transport")]
pub use transport::ReqwestTransport;
pub use transport::{
    DispatchTransport, DynTransport, HttpMethod, HttpRequest, HttpResponse, RecordingTransport,
};
pub use trigger::{
    DispatchPayload, DispatchRequest, FlowParams, FlowType, TriggerManager, TriggerSpec,
    DEFAULT_API_BASE,
};
pub use utils::{logging, validation};
