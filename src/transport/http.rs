use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::instrument;

use crate::error::{DispatchError, Result};
use crate::transport::{DispatchTransport, HttpMethod, HttpRequest, HttpResponse};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// 创建默认客户端
    ///
    /// GitHub 要求每个请求都带 `User-Agent`，这里在客户端层统一设置。
    /// 不覆盖超时，沿用 reqwest 默认值。
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = reqwest::Client::builder()
            .user_agent(concat!("nodeprop/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DispatchTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        // 状态码已确定，读取响应体失败时留空，由调用方按状态码判断结果
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(status, error = %err, "failed to read dispatch response body");
                String::new()
            }
        };
        Ok(HttpResponse { status, body })
    }
}
