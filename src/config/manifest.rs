use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::trigger::TriggerSpec;
use crate::utils::validation::ConfigValidator;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionConfig {
    pub action_name: String,
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub workflow_file: String,
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoConfig {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub workflows: Vec<String>,
}

fn default_ref() -> String {
    "main".to_string()
}

/// 调度清单，描述可触发的 flow 以及各仓库允许的 flow
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GatewayManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default)]
    pub actions: BTreeMap<String, ActionConfig>,
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowConfig>,
    #[serde(default)]
    pub repos: BTreeMap<String, RepoConfig>,
}

impl GatewayManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            DispatchError::Config(format!("failed to read manifest `{}`: {err}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let manifest: GatewayManifest = serde_json::from_str(content)
            .map_err(|err| DispatchError::Config(format!("failed to parse manifest: {err}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(api_base) = &self.api_base {
            ConfigValidator::validate_url(api_base)?;
        }
        for (name, action) in &self.actions {
            ConfigValidator::validate_flow_name(name)?;
            ConfigValidator::validate_flow_name(&action.action_name)?;
            ConfigValidator::validate_ref(&action.git_ref)?;
        }
        for (name, workflow) in &self.workflows {
            ConfigValidator::validate_flow_name(name)?;
            ConfigValidator::validate_workflow_file(&workflow.workflow_file)?;
            ConfigValidator::validate_ref(&workflow.git_ref)?;
        }
        for (repo, entry) in &self.repos {
            ConfigValidator::validate_repo(repo)?;
            for name in entry.actions.iter().chain(entry.workflows.iter()) {
                ConfigValidator::validate_flow_name(name)?;
            }
        }
        Ok(())
    }

    pub fn action_specs(&self) -> impl Iterator<Item = (&String, TriggerSpec)> {
        self.actions.iter().map(|(name, action)| {
            (
                name,
                TriggerSpec::action(action.action_name.clone(), action.git_ref.clone()),
            )
        })
    }

    pub fn workflow_specs(&self) -> impl Iterator<Item = (&String, TriggerSpec)> {
        self.workflows.iter().map(|(name, workflow)| {
            (
                name,
                TriggerSpec::workflow(workflow.workflow_file.clone(), workflow.git_ref.clone()),
            )
        })
    }
}
