use thiserror::Error;

/// 评估流程错误类型
///
/// 所有错误最终都会在调度边界被转换为 `EvaluationOutcome::Failure`，
/// 不会传播给调用方。
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// 输入轨迹长度不合法（不会发送到外部服务）
    #[error("invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// 没有可用的认证令牌
    #[error("no authentication token available")]
    MissingCredentials,

    /// 网络请求失败
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// 服务返回非 2xx 状态码
    #[error("HTTP error {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    /// 服务返回 success=false 或缺少 data
    #[error("evaluation service error: {0}")]
    Service(String),

    /// 请求超时
    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// 请求被取消
    #[error("evaluation cancelled")]
    Cancelled,

    /// 服务响应外层结构无法解析
    #[error("malformed service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// 评估器输出校验失败
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// 评估器输出校验错误
///
/// 诊断信息是固定文本，原始内容只写入 debug 日志。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// 无法解析为 JSON
    #[error("could not parse evaluator response as JSON")]
    Parse,
    /// 缺少必需字段
    #[error("invalid response structure")]
    Schema,
}

// ========== 便捷构造函数 ==========

impl EvaluationError {
    /// 创建网络请求失败错误
    pub fn transport(endpoint: impl Into<String>, source: impl std::fmt::Display) -> Self {
        EvaluationError::Transport {
            endpoint: endpoint.into(),
            message: source.to_string(),
        }
    }

    /// 创建状态码错误
    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        EvaluationError::HttpStatus {
            endpoint: endpoint.into(),
            status,
        }
    }
}

/// 评估结果类型别名
pub type EvalResult<T> = Result<T, EvaluationError>;
