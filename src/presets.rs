//! 内置的 NodeProp workflow
//!
//! `nodeprop-action.yml` 在 `main` 上运行，输入为空。

use crate::error::Result;
use crate::trigger::{FlowParams, TriggerManager, TriggerSpec};

pub const NODEPROP_FLOW: &str = "nodeprop";
pub const NODEPROP_WORKFLOW_FILE: &str = "nodeprop-action.yml";
pub const NODEPROP_REF: &str = "main";

pub fn nodeprop_workflow() -> TriggerSpec {
    TriggerSpec::workflow(NODEPROP_WORKFLOW_FILE, NODEPROP_REF)
}

pub fn register_nodeprop(manager: &TriggerManager) {
    manager.register_workflow(NODEPROP_FLOW, nodeprop_workflow());
}

pub async fn trigger_nodeprop(manager: &TriggerManager, repo: &str, token: &str) -> Result<()> {
    manager
        .dispatch(&nodeprop_workflow(), repo, token, &FlowParams::new())
        .await
}
