use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::registry::RepositoryRegistry;
use crate::trigger::{FlowParams, FlowType, TriggerManager};

#[async_trait]
pub trait FlowFacade: Send + Sync {
    fn register_repo(&self, repo: &str, actions: Vec<String>, workflows: Vec<String>) -> Result<()>;

    async fn trigger_repo_flows(&self, repo: &str, token: &str) -> Result<()>;

    async fn trigger_custom_flow(
        &self,
        repo: &str,
        flow_type: &str,
        name: &str,
        token: &str,
        params: &FlowParams,
    ) -> Result<()>;
}

pub type DynFlowFacade = Arc<dyn FlowFacade>;

/// 将高层请求翻译为注册表与触发管理器调用，本身不持有状态
pub struct DispatchFacade {
    manager: Arc<TriggerManager>,
    registry: Arc<RepositoryRegistry>,
}

impl DispatchFacade {
    pub fn new(manager: Arc<TriggerManager>, registry: Arc<RepositoryRegistry>) -> Self {
        Self { manager, registry }
    }
}

#[async_trait]
impl FlowFacade for DispatchFacade {
    fn register_repo(&self, repo: &str, actions: Vec<String>, workflows: Vec<String>) -> Result<()> {
        self.registry.register_repo(repo, actions, workflows);
        Ok(())
    }

    async fn trigger_repo_flows(&self, repo: &str, token: &str) -> Result<()> {
        self.registry
            .trigger_for_repo(repo, &self.manager, token)
            .await
    }

    async fn trigger_custom_flow(
        &self,
        repo: &str,
        flow_type: &str,
        name: &str,
        token: &str,
        params: &FlowParams,
    ) -> Result<()> {
        match flow_type.parse::<FlowType>()? {
            FlowType::Action => self.manager.execute_action(name, repo, token, params).await,
            FlowType::Workflow => self.manager.execute_workflow(name, repo, token, params).await,
        }
    }
}
