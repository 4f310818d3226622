use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::instrument;

use crate::error::{DispatchError, RegistryKind, Result};
use crate::transport::{DynTransport, HttpRequest};
use crate::trigger::types::{DispatchPayload, FlowParams, TriggerSpec};
use crate::utils::validation::ConfigValidator;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const SUCCESS_STATUS: u16 = 204;

#[derive(Default)]
struct TriggerTables {
    actions: HashMap<String, TriggerSpec>,
    workflows: HashMap<String, TriggerSpec>,
}

/// 触发管理器
///
/// 维护 action 与 workflow 两张名称表，并通过注入的传输层发送调度请求。
/// 锁只覆盖查表与写表，发送请求前释放。
pub struct TriggerManager {
    tables: Mutex<TriggerTables>,
    transport: DynTransport,
    api_base: String,
}

impl TriggerManager {
    pub fn new(transport: DynTransport) -> Self {
        Self::with_api_base(transport, DEFAULT_API_BASE)
    }

    pub fn with_api_base(transport: DynTransport, api_base: impl Into<String>) -> Self {
        Self {
            tables: Mutex::new(TriggerTables::default()),
            transport,
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn register_action(&self, name: impl Into<String>, spec: TriggerSpec) {
        let name = name.into();
        tracing::debug!(action = %name, spec = ?spec, "action registered");
        self.tables.lock().actions.insert(name, spec);
    }

    pub fn register_workflow(&self, name: impl Into<String>, spec: TriggerSpec) {
        let name = name.into();
        tracing::debug!(workflow = %name, spec = ?spec, "workflow registered");
        self.tables.lock().workflows.insert(name, spec);
    }

    pub fn action(&self, name: &str) -> Option<TriggerSpec> {
        self.tables.lock().actions.get(name).cloned()
    }

    pub fn workflow(&self, name: &str) -> Option<TriggerSpec> {
        self.tables.lock().workflows.get(name).cloned()
    }

    pub fn action_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tables.lock().actions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn workflow_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tables.lock().workflows.keys().cloned().collect();
        names.sort();
        names
    }

    #[instrument(skip(self, token, params))]
    pub async fn execute_action(
        &self,
        name: &str,
        target: &str,
        token: &str,
        params: &FlowParams,
    ) -> Result<()> {
        let spec = self
            .action(name)
            .ok_or_else(|| DispatchError::not_registered(RegistryKind::Action, name))?;
        self.dispatch(&spec, target, token, params).await
    }

    #[instrument(skip(self, token, params))]
    pub async fn execute_workflow(
        &self,
        name: &str,
        target: &str,
        token: &str,
        params: &FlowParams,
    ) -> Result<()> {
        let spec = self
            .workflow(name)
            .ok_or_else(|| DispatchError::not_registered(RegistryKind::Workflow, name))?;
        self.dispatch(&spec, target, token, params).await
    }

    /// 发送一次调度请求，不重试
    ///
    /// `target` 必须是 `owner/name`，否则不发送请求。
    pub async fn dispatch(
        &self,
        spec: &TriggerSpec,
        target: &str,
        token: &str,
        params: &FlowParams,
    ) -> Result<()> {
        ConfigValidator::validate_repo(target)?;
        let url = spec.endpoint(&self.api_base, target);
        let body = serde_json::to_vec(&DispatchPayload {
            git_ref: spec.git_ref(),
            inputs: params,
        })?;

        let request = HttpRequest::post(url.clone())
            .with_header("Authorization", format!("Bearer {token}"))
            .with_header("Content-Type", "application/json")
            .with_body(body);

        tracing::info!(url = %url, flow_type = %spec.flow_type(), git_ref = spec.git_ref(), "sending dispatch");
        let response = self.transport.send(request).await?;

        if response.status != SUCCESS_STATUS {
            tracing::warn!(url = %url, status = response.status, "dispatch rejected");
            return Err(DispatchError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }
}
