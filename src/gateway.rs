use std::sync::Arc;

use crate::actor::FlowActor;
use crate::config::GatewayManifest;
use crate::error::Result;
use crate::facade::DispatchFacade;
use crate::registry::RepositoryRegistry;
use crate::transport::DynTransport;
use crate::trigger::{TriggerManager, DEFAULT_API_BASE};

/// 组装触发管理器、仓库注册表、facade 与 actor
///
/// 每个 `Gateway` 拥有独立的状态，调用方按需创建并传递引用。
pub struct Gateway {
    manager: Arc<TriggerManager>,
    registry: Arc<RepositoryRegistry>,
    actor: FlowActor,
}

impl Gateway {
    pub fn new(transport: DynTransport) -> Self {
        Self::with_api_base(transport, DEFAULT_API_BASE)
    }

    pub fn with_api_base(transport: DynTransport, api_base: impl Into<String>) -> Self {
        let manager = Arc::new(TriggerManager::with_api_base(transport, api_base));
        let registry = Arc::new(RepositoryRegistry::new());
        let facade = DispatchFacade::new(Arc::clone(&manager), Arc::clone(&registry));
        Self {
            manager,
            registry,
            actor: FlowActor::new(Arc::new(facade)),
        }
    }

    /// 按清单注册 flow 与仓库
    ///
    /// `api_base_override` 优先于清单中的 `api_base`。
    pub fn from_manifest(
        manifest: &GatewayManifest,
        transport: DynTransport,
        api_base_override: Option<&str>,
    ) -> Result<Self> {
        manifest.validate()?;
        let api_base = api_base_override
            .or(manifest.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE);
        let gateway = Self::with_api_base(transport, api_base);

        for (name, spec) in manifest.action_specs() {
            gateway.manager.register_action(name.clone(), spec);
        }
        for (name, spec) in manifest.workflow_specs() {
            gateway.manager.register_workflow(name.clone(), spec);
        }
        for (repo, entry) in &manifest.repos {
            gateway
                .actor
                .register_repo(repo, entry.actions.clone(), entry.workflows.clone())?;
        }

        tracing::info!(
            api_base = gateway.manager.api_base(),
            actions = manifest.actions.len(),
            workflows = manifest.workflows.len(),
            repos = manifest.repos.len(),
            "manifest applied"
        );
        Ok(gateway)
    }

    pub fn manager(&self) -> &Arc<TriggerManager> {
        &self.manager
    }

    pub fn registry(&self) -> &Arc<RepositoryRegistry> {
        &self.registry
    }

    pub fn actor(&self) -> &FlowActor {
        &self.actor
    }
}
