//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `evaluator` - 单次评估调度
//! - 发送前校验（轨迹长度、令牌）
//! - 构建请求、发送、校验响应
//! - 所有失败都转换为 `EvaluationOutcome::Failure`
//! - 可用性和统计探测
//!
//! ### `batch_processor` - 批量评估
//! - 固定大小分组，组内并发
//! - 组间固定间隔
//! - 结果顺序与输入一致
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<EvaluationRequest>)
//!     ↓
//! evaluator (处理单个 EvaluationRequest)
//!     ↓
//! services (能力层：normalize / build / validate / summary)
//!     ↓
//! clients (基础设施：ApiClient / Transport / CredentialProvider)
//! ```

pub mod batch_processor;
pub mod evaluator;

pub use batch_processor::{BatchProcessor, BatchSummary};
pub use evaluator::{Evaluator, ModelSettings};
