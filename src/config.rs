use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 评估后端基础地址
    pub api_base_url: String,
    /// 保存 Bearer 令牌的环境变量名
    pub api_token_env: String,
    // --- 评估模型配置（原样转发给后端） ---
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// 单次请求超时（毫秒）
    pub request_timeout_ms: u64,
    /// 每批并发请求数
    pub batch_size: usize,
    /// 批次之间的固定间隔（毫秒）
    pub batch_pause_ms: u64,
    /// 批量评估 TOML 文件
    pub requests_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            api_token_env: "EVALUATION_API_TOKEN".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            request_timeout_ms: 30_000,
            batch_size: 5,
            batch_pause_ms: 1000,
            requests_file: "evaluations.toml".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("EVALUATION_API_BASE_URL").unwrap_or(default.api_base_url),
            api_token_env: std::env::var("EVALUATION_API_TOKEN_ENV").unwrap_or(default.api_token_env),
            model_name: std::env::var("EVALUATION_MODEL").unwrap_or(default.model_name),
            temperature: std::env::var("EVALUATION_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.temperature),
            max_tokens: std::env::var("EVALUATION_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_tokens),
            request_timeout_ms: std::env::var("EVALUATION_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_ms),
            batch_size: std::env::var("EVALUATION_BATCH_SIZE").ok().and_then(|v| v.parse().ok()).filter(|v: &usize| *v > 0).unwrap_or(default.batch_size),
            batch_pause_ms: std::env::var("EVALUATION_BATCH_PAUSE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.batch_pause_ms),
            requests_file: std::env::var("EVALUATION_REQUESTS_FILE").unwrap_or(default.requests_file),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }
}
