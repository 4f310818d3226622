use crate::error::{DispatchError, Result};

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证仓库标识，格式为 `owner/name`
    pub fn validate_repo(repo: &str) -> Result<()> {
        let mut parts = repo.split('/');
        let valid = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if Self::is_slug(owner) && Self::is_slug(name)
        );
        if !valid {
            return Err(DispatchError::Config(format!(
                "repository `{repo}` must have the form `owner/name`"
            )));
        }
        Ok(())
    }

    /// 验证 URL 格式
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(DispatchError::Config("api base url must not be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DispatchError::Config(format!(
                "api base url `{url}` must start with http:// or https://"
            )));
        }

        Ok(())
    }

    /// 验证 flow 名称
    pub fn validate_flow_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(DispatchError::Config("flow name must not be empty".to_string()));
        }

        if name.len() > 100 {
            return Err(DispatchError::Config(format!(
                "flow name `{name}` is longer than 100 characters"
            )));
        }

        if name.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(DispatchError::Config(format!(
                "flow name `{name}` must not contain whitespace or `/`"
            )));
        }

        Ok(())
    }

    pub fn validate_workflow_file(file: &str) -> Result<()> {
        Self::validate_flow_name(file)?;
        let is_yaml = file.ends_with(".yml") || file.ends_with(".yaml");
        let is_id = file.chars().all(|c| c.is_ascii_digit());
        if !is_yaml && !is_id {
            tracing::warn!(
                workflow_file = %file,
                "workflow file is neither a .yml/.yaml file name nor a numeric workflow id"
            );
        }
        Ok(())
    }

    pub fn validate_ref(git_ref: &str) -> Result<()> {
        if git_ref.trim().is_empty() {
            return Err(DispatchError::Config("git ref must not be empty".to_string()));
        }
        Ok(())
    }

    fn is_slug(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    }
}
