pub mod manager;
pub mod types;

pub use manager::{TriggerManager, DEFAULT_API_BASE};
pub use types::{DispatchPayload, DispatchRequest, FlowParams, FlowType, TriggerSpec};
