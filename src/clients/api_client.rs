/// 评估后端客户端
///
/// 在传输层之上附加认证令牌和超时
use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::warn;

use crate::clients::credentials::CredentialProvider;
use crate::clients::transport::{ApiRequest, ApiResponse, HttpMethod, Transport};
use crate::error::{EvalResult, EvaluationError};

/// 评估后端客户端
pub struct ApiClient<T, C> {
    transport: T,
    credentials: C,
    timeout: Duration,
}

impl<T: Transport, C: CredentialProvider> ApiClient<T, C> {
    /// 创建新的客户端
    pub fn new(transport: T, credentials: C, timeout: Duration) -> Self {
        Self {
            transport,
            credentials,
            timeout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 读取当前令牌，没有令牌时在发送前失败
    pub fn bearer_token(&self) -> EvalResult<String> {
        self.credentials
            .bearer_token()
            .ok_or(EvaluationError::MissingCredentials)
    }

    /// 发送 POST JSON 请求
    pub async fn post_json(&self, path: &str, token: String, body: JsonValue) -> EvalResult<ApiResponse> {
        self.send(ApiRequest {
            method: HttpMethod::Post,
            path: path.to_string(),
            bearer_token: token,
            body: Some(body),
        })
        .await
    }

    /// 发送 GET 请求
    pub async fn get(&self, path: &str) -> EvalResult<ApiResponse> {
        let token = self.bearer_token()?;
        self.send(ApiRequest {
            method: HttpMethod::Get,
            path: path.to_string(),
            bearer_token: token,
            body: None,
        })
        .await
    }

    async fn send(&self, request: ApiRequest) -> EvalResult<ApiResponse> {
        let path = request.path.clone();
        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} 请求超时 ({}ms)", path, self.timeout.as_millis());
                Err(EvaluationError::Timeout {
                    endpoint: path,
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}
