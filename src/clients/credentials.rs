//! 认证令牌提供者
//!
//! 令牌由调用方注入，本库不负责获取或刷新。每次请求都会重新读取。

/// 提供 Bearer 令牌的能力
pub trait CredentialProvider: Send + Sync {
    /// 当前令牌；没有可用令牌时返回 `None`
    fn bearer_token(&self) -> Option<String>;
}

/// 固定令牌
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        let token = self.0.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

/// 从环境变量读取令牌
#[derive(Debug, Clone)]
pub struct EnvToken {
    var_name: String,
}

impl EnvToken {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn bearer_token(&self) -> Option<String> {
        self()
    }
}
