//! 单次评估调度 - 编排层
//!
//! 流程：长度校验 → 读取令牌 → 构建请求 → 发送 → 校验响应。
//!
//! `evaluate` 是全函数：任何失败都会变成 `EvaluationOutcome::Failure`，
//! 发送前失败的耗时记为 0，发送后失败记实际耗时。

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clients::transport::EVALUATE_PATH;
use crate::clients::{ApiClient, CredentialProvider, Transport};
use crate::config::Config;
use crate::error::{EvalResult, EvaluationError};
use crate::models::evaluation::{EvaluationOutcome, EvaluationRequest, EvaluationResult, Statistics};
use crate::services::{build_request, probe, validate, validate_input_lengths};
use crate::utils::logging::truncate_text;

/// 转发给后端的模型配置（`configuracion` 字段）
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl From<&Config> for ModelSettings {
    fn from(config: &Config) -> Self {
        Self {
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// 后端响应外层结构
#[derive(Debug, Deserialize)]
struct BackendResponse {
    #[serde(default)]
    success: bool,
    data: Option<JsonValue>,
    error: Option<String>,
    metadata: Option<BackendMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendMetadata {
    tokens_used: Option<u64>,
}

/// 单次评估调度器
pub struct Evaluator<T, C> {
    client: ApiClient<T, C>,
    settings: ModelSettings,
}

impl<T: Transport, C: CredentialProvider> Evaluator<T, C> {
    /// 创建新的调度器
    pub fn new(client: ApiClient<T, C>, settings: ModelSettings) -> Self {
        Self { client, settings }
    }

    pub fn from_config(transport: T, credentials: C, config: &Config) -> Self {
        let client = ApiClient::new(transport, credentials, config.request_timeout());
        Self::new(client, ModelSettings::from(config))
    }

    pub fn client(&self) -> &ApiClient<T, C> {
        &self.client
    }

    /// 评估单个请求，永远返回一个结果
    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationOutcome {
        self.evaluate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// 评估单个请求，取消时返回失败结果
    pub async fn evaluate_with_cancel(
        &self,
        request: &EvaluationRequest,
        cancel: &CancellationToken,
    ) -> EvaluationOutcome {
        let token = match self.prepare(request) {
            Ok(token) => token,
            Err(e) => {
                warn!("{} ⚠️ 发送前失败: {}", request.context, e);
                return EvaluationOutcome::failure(e.to_string(), 0);
            }
        };
        if cancel.is_cancelled() {
            return EvaluationOutcome::failure(EvaluationError::Cancelled.to_string(), 0);
        }

        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EvaluationError::Cancelled),
            result = self.dispatch(request, token) => result,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok((result, tokens_used)) => {
                info!(
                    "{} ✓ 评估完成: {} 分, 图形 {} ({}ms)",
                    request.context, result.score, result.detected_shape, elapsed_ms
                );
                EvaluationOutcome::success(result, elapsed_ms, tokens_used)
            }
            Err(e) => {
                warn!("{} ❌ 评估失败: {} ({}ms)", request.context, e, elapsed_ms);
                EvaluationOutcome::failure(e.to_string(), elapsed_ms)
            }
        }
    }

    /// 检查评估服务是否可用
    pub async fn check_availability(&self) -> bool {
        probe::check_availability(&self.client).await
    }

    /// 获取服务端统计
    pub async fn get_statistics(&self) -> Option<Statistics> {
        probe::get_statistics(&self.client).await
    }

    /// 发送前检查，返回令牌
    fn prepare(&self, request: &EvaluationRequest) -> EvalResult<String> {
        let validation = validate_input_lengths(&request.user_trace, &request.model_trace);
        if !validation.valid {
            return Err(EvaluationError::InvalidInput(validation.errors));
        }
        self.client.bearer_token()
    }

    async fn dispatch(
        &self,
        request: &EvaluationRequest,
        token: String,
    ) -> EvalResult<(EvaluationResult, Option<u64>)> {
        let built = build_request(
            &request.user_trace,
            &request.model_trace,
            request.context.expected_shape,
            &request.context,
        );

        let body = json!({
            "prompt": built.instruction_text,
            "coordenadas": built.payload,
            "configuracion": {
                "modelo": self.settings.model_name,
                "temperatura": self.settings.temperature,
                "maxTokens": self.settings.max_tokens,
            },
        });

        let response = self.client.post_json(EVALUATE_PATH, token, body).await?;
        if !response.is_success() {
            return Err(EvaluationError::http_status(EVALUATE_PATH, response.status));
        }

        let envelope: BackendResponse = serde_json::from_str(&response.body)?;
        if !envelope.success {
            return Err(EvaluationError::Service(
                envelope
                    .error
                    .unwrap_or_else(|| "unknown error from evaluation service".to_string()),
            ));
        }

        let raw = match envelope.data {
            Some(JsonValue::String(text)) if !text.trim().is_empty() => text,
            Some(JsonValue::Object(map)) => JsonValue::Object(map).to_string(),
            _ => {
                return Err(EvaluationError::Service(
                    "evaluation service returned no data".to_string(),
                ))
            }
        };
        debug!("评估模型原始输出: {}", truncate_text(&raw, 200));

        let result = validate(&raw)?;
        let tokens_used = envelope.metadata.and_then(|m| m.tokens_used);

        Ok((result, tokens_used))
    }
}
