use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::transport::{DispatchTransport, HttpRequest, HttpResponse};

/// 不访问网络的传输实现，记录每个请求并返回预设响应
pub struct RecordingTransport {
    response: Mutex<HttpResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::with_status(204)
    }

    pub fn with_status(status: u16) -> Self {
        Self::with_response(HttpResponse::new(status))
    }

    pub fn with_response(response: HttpResponse) -> Self {
        Self {
            response: Mutex::new(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_response(&self, response: HttpResponse) {
        *self.response.lock() = response;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DispatchTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request);
        Ok(self.response.lock().clone())
    }
}
