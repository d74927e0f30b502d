use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::exercise::ExerciseContext;
use crate::models::point::Trace;

/// 一次评估请求
///
/// 持有用户轨迹、参考（模型）轨迹和练习上下文，只存活一个请求周期。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub user_trace: Trace,
    pub model_trace: Trace,
    pub context: ExerciseContext,
}

impl EvaluationRequest {
    pub fn new(user_trace: Trace, model_trace: Trace, context: ExerciseContext) -> Self {
        Self {
            user_trace,
            model_trace,
            context,
        }
    }
}

/// 评估细节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDetails {
    /// 相似度 [0, 1]
    pub similarity: f64,
    pub errors: Vec<String>,
    pub strengths: Vec<String>,
}

/// 校验后的评估结果
///
/// 只能由 `response_validator` 构造出越界安全的值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// 总分 [0, 100]
    pub score: u8,
    pub analysis: String,
    pub detected_shape: String,
    /// 精确度 [0, 1]
    pub precision: f64,
    /// 覆盖率 [0, 1]
    pub coverage: f64,
    pub suggestions: Vec<String>,
    pub details: EvaluationDetails,
}

/// 评估元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// ISO-8601 时间戳
    pub timestamp: String,
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
}

impl Metadata {
    /// 以当前时间创建元数据
    pub fn now(processing_time_ms: u64, tokens_used: Option<u64>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            processing_time_ms,
            tokens_used,
        }
    }
}

/// 单次评估的结果：成功或失败，总带有元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EvaluationOutcome {
    Success {
        result: EvaluationResult,
        metadata: Metadata,
    },
    Failure {
        error: String,
        metadata: Metadata,
    },
}

impl EvaluationOutcome {
    /// 成功结果，时间戳取当前时间
    pub fn success(result: EvaluationResult, processing_time_ms: u64, tokens_used: Option<u64>) -> Self {
        EvaluationOutcome::Success {
            result,
            metadata: Metadata::now(processing_time_ms, tokens_used),
        }
    }

    /// 失败结果，时间戳取当前时间
    pub fn failure(error: impl Into<String>, processing_time_ms: u64) -> Self {
        EvaluationOutcome::Failure {
            error: error.into(),
            metadata: Metadata::now(processing_time_ms, None),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EvaluationOutcome::Success { .. })
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            EvaluationOutcome::Success { metadata, .. } | EvaluationOutcome::Failure { metadata, .. } => metadata,
        }
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            EvaluationOutcome::Success { result, .. } => Some(result),
            EvaluationOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EvaluationOutcome::Success { .. } => None,
            EvaluationOutcome::Failure { error, .. } => Some(error),
        }
    }
}

/// 服务端累计统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_evaluations: u64,
    pub average_processing_time_ms: f64,
    pub tokens_used: u64,
    #[serde(default)]
    pub last_evaluation_timestamp: Option<String>,
}
