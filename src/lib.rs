//! # Drawing Evaluation
//!
//! 把儿童精细动作练习中的手绘轨迹提交给外部评估服务打分，并把结果渲染成摘要。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 只暴露"发请求"的能力
//! - `Transport` - HTTP 传输（`HttpTransport` 基于 reqwest）
//! - `CredentialProvider` - 注入的 Bearer 令牌
//! - `ApiClient` - 附加令牌和超时
//!
//! ### ② 业务能力层（Services）
//! - `normalizer` - 坐标归一化到 0-100
//! - `request_builder` - 构建坐标数据和提示词
//! - `response_validator` - 校验并截断评估模型输出（唯一信任边界）
//! - `summary` - 渲染摘要
//! - `input_validator` / `probe` - 长度校验、可用性和统计
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/evaluator` - 单次评估，永远返回一个结果
//! - `orchestrator/batch_processor` - 分组并发 + 组间节流
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{ApiClient, CredentialProvider, EnvToken, HttpTransport, StaticToken, Transport};
pub use config::Config;
pub use error::{EvalResult, EvaluationError, ValidationError};
pub use models::{
    EvaluationOutcome, EvaluationRequest, EvaluationResult, ExerciseContext, ExpectedShape, Point,
    Statistics, Trace,
};
pub use orchestrator::{BatchProcessor, BatchSummary, Evaluator, ModelSettings};
pub use services::{
    build_request, format_summary, normalize, validate, validate_input_lengths, InputValidation,
};
pub use utils::logging;
