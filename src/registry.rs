use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::instrument;

use crate::error::{DispatchError, RegistryKind, Result};
use crate::trigger::{FlowParams, TriggerManager};

/// 仓库允许触发的 action 与 workflow 名称
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepoEntry {
    pub actions: Vec<String>,
    pub workflows: Vec<String>,
}

/// 仓库注册表
#[derive(Default)]
pub struct RepositoryRegistry {
    repos: RwLock<HashMap<String, RepoEntry>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            repos: RwLock::new(HashMap::new()),
        }
    }

    /// 注册仓库，已存在时整体覆盖
    pub fn register_repo(&self, repo: impl Into<String>, actions: Vec<String>, workflows: Vec<String>) {
        let repo = repo.into();
        tracing::debug!(
            repo = %repo,
            actions = actions.len(),
            workflows = workflows.len(),
            "repository registered"
        );
        self.repos
            .write()
            .insert(repo, RepoEntry { actions, workflows });
    }

    pub fn get(&self, repo: &str) -> Option<RepoEntry> {
        self.repos.read().get(repo).cloned()
    }

    pub fn repos(&self) -> Vec<String> {
        let mut repos: Vec<_> = self.repos.read().keys().cloned().collect();
        repos.sort();
        repos
    }

    /// 依次调度仓库注册的全部 workflow，遇到第一个错误即返回
    ///
    /// 只触发 workflow，不触发 action。每个 workflow 使用空输入。
    #[instrument(skip(self, manager, token))]
    pub async fn trigger_for_repo(
        &self,
        repo: &str,
        manager: &TriggerManager,
        token: &str,
    ) -> Result<()> {
        let entry = self
            .get(repo)
            .ok_or_else(|| DispatchError::not_registered(RegistryKind::Repository, repo))?;

        let params = FlowParams::new();
        for workflow in &entry.workflows {
            if let Err(err) = manager.execute_workflow(workflow, repo, token, &params).await {
                tracing::warn!(repo = %repo, workflow = %workflow, error = %err, "repository trigger stopped");
                return Err(err.context(format!("trigger workflow `{workflow}` for `{repo}`")));
            }
        }
        tracing::info!(repo = %repo, count = entry.workflows.len(), "repository workflows dispatched");
        Ok(())
    }
}
