use crate::error::{DispatchError, Result};
use std::env;

pub const DEFAULT_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const DEBUG_VAR: &str = "NODEPROP_DEBUG";

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 解析 GitHub token
    ///
    /// 优先级：
    /// 1. 直接传入的值（如果不以 ${} 包裹）
    /// 2. 环境变量（如果值为 ${VAR_NAME} 格式）
    /// 3. `default_env_var` 指定的环境变量（值为空或未传入时）
    pub fn resolve_token(token: Option<&str>, default_env_var: &str) -> Result<String> {
        match token.map(str::trim) {
            Some(value) if value.starts_with("${") && value.ends_with('}') => {
                Self::get_env(&value[2..value.len() - 1])
            }
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Self::get_env(default_env_var),
        }
    }

    /// 从环境变量获取值，空字符串视为未设置
    pub fn get_env(key: &str) -> Result<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(DispatchError::Config(format!(
                "environment variable `{key}` is not set"
            ))),
        }
    }

    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }

    pub fn is_debug_mode() -> bool {
        env::var(DEBUG_VAR).is_ok()
    }
}
