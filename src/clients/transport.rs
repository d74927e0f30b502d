//! 传输层 - 基础设施层
//!
//! 只暴露"发一个 HTTP 请求"的能力，不认识评估请求和评估结果。
//! 测试中用内存实现替换 `HttpTransport`。

use std::future::Future;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::Config;
use crate::error::{EvalResult, EvaluationError};

/// 评估接口
pub const EVALUATE_PATH: &str = "/api/evaluaciones/chatgpt";
/// 可用性探测接口
pub const STATUS_PATH: &str = "/api/evaluaciones/chatgpt/status";
/// 统计接口
pub const STATS_PATH: &str = "/api/evaluaciones/chatgpt/stats";

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// 发往后端的请求
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub bearer_token: String,
    /// JSON 请求体（以 `Content-Type: application/json` 发送）
    pub body: Option<JsonValue>,
}

/// 后端响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 是否为 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输能力
pub trait Transport: Send + Sync {
    /// 发送请求。只有网络层失败才返回错误，非 2xx 状态码照常返回。
    fn execute(&self, request: ApiRequest) -> impl Future<Output = EvalResult<ApiResponse>> + Send;
}

/// 基于 reqwest 的 HTTP 传输
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// 创建新的 HTTP 传输
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> EvalResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{:?} {}", request.method, url);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        let mut builder = builder.bearer_auth(&request.bearer_token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EvaluationError::transport(&request.path, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| EvaluationError::transport(&request.path, e))?;

        debug!("{} 返回状态码 {}，响应 {} 字节", request.path, status, body.len());

        Ok(ApiResponse { status, body })
    }
}
