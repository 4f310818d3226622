use crate::error::Result;
use crate::facade::DynFlowFacade;
use crate::trigger::{DispatchRequest, FlowParams};

/// 对外入口，原样转发到 facade
#[derive(Clone)]
pub struct FlowActor {
    facade: DynFlowFacade,
}

impl FlowActor {
    pub fn new(facade: DynFlowFacade) -> Self {
        Self { facade }
    }

    pub fn register_repo(&self, repo: &str, actions: Vec<String>, workflows: Vec<String>) -> Result<()> {
        self.facade.register_repo(repo, actions, workflows)
    }

    pub async fn run_repo_flows(&self, repo: &str, token: &str) -> Result<()> {
        self.facade.trigger_repo_flows(repo, token).await
    }

    pub async fn run_custom_flow(
        &self,
        repo: &str,
        flow_type: &str,
        name: &str,
        token: &str,
        params: &FlowParams,
    ) -> Result<()> {
        self.facade
            .trigger_custom_flow(repo, flow_type, name, token, params)
            .await
    }

    pub async fn run_request(&self, request: DispatchRequest) -> Result<()> {
        self.run_custom_flow(
            &request.repo,
            &request.flow_type,
            &request.name,
            &request.token,
            &request.params,
        )
        .await
    }
}
