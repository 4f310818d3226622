use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

/// 注册表中可查找的条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Action,
    Workflow,
    Repository,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Action => f.write_str("action"),
            RegistryKind::Workflow => f.write_str("workflow"),
            RegistryKind::Repository => f.write_str("repository"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{kind} `{name}` not registered")]
    NotRegistered { kind: RegistryKind, name: String },
    #[error("invalid flow type: {0}")]
    InvalidFlowType(String),
    #[error("failed to encode dispatch payload: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("failed to send dispatch request: {0}")]
    Transport(String),
    #[error("unexpected status code: {status}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DispatchError>,
    },
}

impl DispatchError {
    pub fn not_registered(kind: RegistryKind, name: impl Into<String>) -> Self {
        DispatchError::NotRegistered {
            kind,
            name: name.into(),
        }
    }

    /// 附加上下文描述，不改变底层错误
    pub fn context(self, context: impl Into<String>) -> Self {
        DispatchError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// 剥离所有 `Context` 包装，返回最初的错误
    pub fn root(&self) -> &DispatchError {
        let mut current = self;
        while let DispatchError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn status(&self) -> Option<u16> {
        match self.root() {
            DispatchError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
