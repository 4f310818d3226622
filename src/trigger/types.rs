use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// 调度输入参数，序列化为请求体中的 `inputs` 对象
pub type FlowParams = BTreeMap<String, String>;

/// 已注册的触发配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSpec {
    /// repository dispatch，`POST /repos/{target}/dispatches`
    Action {
        action_name: String,
        #[serde(rename = "ref")]
        git_ref: String,
    },
    /// workflow 文件调度，`POST /repos/{target}/actions/workflows/{file}/dispatches`
    Workflow {
        workflow_file: String,
        #[serde(rename = "ref")]
        git_ref: String,
    },
}

impl TriggerSpec {
    pub fn action(action_name: impl Into<String>, git_ref: impl Into<String>) -> Self {
        TriggerSpec::Action {
            action_name: action_name.into(),
            git_ref: git_ref.into(),
        }
    }

    pub fn workflow(workflow_file: impl Into<String>, git_ref: impl Into<String>) -> Self {
        TriggerSpec::Workflow {
            workflow_file: workflow_file.into(),
            git_ref: git_ref.into(),
        }
    }

    pub fn git_ref(&self) -> &str {
        match self {
            TriggerSpec::Action { git_ref, .. } | TriggerSpec::Workflow { git_ref, .. } => git_ref,
        }
    }

    pub fn flow_type(&self) -> FlowType {
        match self {
            TriggerSpec::Action { .. } => FlowType::Action,
            TriggerSpec::Workflow { .. } => FlowType::Workflow,
        }
    }

    pub fn endpoint(&self, api_base: &str, target: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            TriggerSpec::Action { .. } => format!("{base}/repos/{target}/dispatches"),
            TriggerSpec::Workflow { workflow_file, .. } => {
                let file = urlencoding::encode(workflow_file);
                format!("{base}/repos/{target}/actions/workflows/{file}/dispatches")
            }
        }
    }
}

impl fmt::Display for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSpec::Action {
                action_name,
                git_ref,
            } => write!(f, "action:{action_name}@{git_ref}"),
            TriggerSpec::Workflow {
                workflow_file,
                git_ref,
            } => write!(f, "workflow:{workflow_file}@{git_ref}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Action,
    Workflow,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Action => "action",
            FlowType::Workflow => "workflow",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowType {
    type Err = DispatchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "action" => Ok(FlowType::Action),
            "workflow" => Ok(FlowType::Workflow),
            other => Err(DispatchError::InvalidFlowType(other.to_string())),
        }
    }
}

/// 单次调度请求，调用结束即丢弃
#[derive(Clone, Debug)]
pub struct DispatchRequest {
    pub repo: String,
    pub flow_type: String,
    pub name: String,
    pub token: String,
    pub params: FlowParams,
}

impl DispatchRequest {
    pub fn new(
        repo: impl Into<String>,
        flow_type: impl Into<String>,
        name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            flow_type: flow_type.into(),
            name: name.into(),
            token: token.into(),
            params: FlowParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct DispatchPayload<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
    pub inputs: &'a FlowParams,
}
