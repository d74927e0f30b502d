//! 批量评估处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **分批**：把请求按固定大小（默认 5）分组
//! 2. **组内并发**：同一组的请求在当前任务上一起等待（`join_all`），不额外 spawn
//! 3. **节流**：组与组之间固定等待（默认 1000ms），最后一组之后不等待
//! 4. **失败隔离**：单个请求失败只影响它自己的结果
//! 5. **顺序保证**：结果数量和顺序与输入完全一致
//!
//! 不处理单个请求的细节，委托给 `Evaluator`。

use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::clients::{CredentialProvider, Transport};
use crate::config::Config;
use crate::error::EvaluationError;
use crate::models::evaluation::{EvaluationOutcome, EvaluationRequest};
use crate::orchestrator::evaluator::Evaluator;
use crate::utils::logging::{log_batch_complete, log_batch_start, print_final_stats};

/// 默认每组请求数
pub const DEFAULT_BATCH_SIZE: usize = 5;
/// 默认组间间隔
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(1000);

/// 批量统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[EvaluationOutcome]) -> Self {
        let success = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            success,
            failed: outcomes.len() - success,
            total: outcomes.len(),
        }
    }
}

/// 批量评估处理器
pub struct BatchProcessor<T, C> {
    evaluator: Evaluator<T, C>,
    batch_size: usize,
    pause: Duration,
}

impl<T: Transport, C: CredentialProvider> BatchProcessor<T, C> {
    /// 使用默认分组大小和间隔创建
    pub fn new(evaluator: Evaluator<T, C>) -> Self {
        Self::with_pacing(evaluator, DEFAULT_BATCH_SIZE, DEFAULT_BATCH_PAUSE)
    }

    /// 自定义分组大小和间隔（分组大小至少为 1）
    pub fn with_pacing(evaluator: Evaluator<T, C>, batch_size: usize, pause: Duration) -> Self {
        Self {
            evaluator,
            batch_size: batch_size.max(1),
            pause,
        }
    }

    pub fn from_config(evaluator: Evaluator<T, C>, config: &Config) -> Self {
        Self::with_pacing(evaluator, config.batch_size, config.batch_pause())
    }

    pub fn evaluator(&self) -> &Evaluator<T, C> {
        &self.evaluator
    }

    /// 批量评估，结果与输入一一对应
    pub async fn evaluate_batch(&self, requests: &[EvaluationRequest]) -> Vec<EvaluationOutcome> {
        self.evaluate_batch_with_cancel(requests, &CancellationToken::new())
            .await
    }

    /// 批量评估，支持取消
    ///
    /// 取消后正在进行的请求和尚未开始的请求都会得到"已取消"的失败结果，
    /// 结果数量和顺序保持不变。
    pub async fn evaluate_batch_with_cancel(
        &self,
        requests: &[EvaluationRequest],
        cancel: &CancellationToken,
    ) -> Vec<EvaluationOutcome> {
        let total = requests.len();
        let total_batches = total.div_ceil(self.batch_size);
        let mut outcomes = Vec::with_capacity(total);

        for (batch_idx, group) in requests.chunks(self.batch_size).enumerate() {
            if batch_idx > 0 {
                self.pause_between_batches(cancel).await;
            }

            if cancel.is_cancelled() {
                warn!("⚠️ 批量评估已取消，跳过第 {}/{} 批", batch_idx + 1, total_batches);
                outcomes.extend(
                    group
                        .iter()
                        .map(|_| EvaluationOutcome::failure(EvaluationError::Cancelled.to_string(), 0)),
                );
                continue;
            }

            let batch_start = batch_idx * self.batch_size;
            log_batch_start(
                batch_idx + 1,
                total_batches,
                batch_start + 1,
                batch_start + group.len(),
                total,
            );

            // join_all 按输入顺序返回，与完成顺序无关
            let group_outcomes = join_all(
                group
                    .iter()
                    .map(|request| self.evaluator.evaluate_with_cancel(request, cancel)),
            )
            .await;

            let summary = BatchSummary::from_outcomes(&group_outcomes);
            log_batch_complete(batch_idx + 1, summary.success, summary.total);

            outcomes.extend(group_outcomes);
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        print_final_stats(summary.success, summary.failed, summary.total);

        outcomes
    }

    async fn pause_between_batches(&self, cancel: &CancellationToken) {
        if self.pause.is_zero() || cancel.is_cancelled() {
            return;
        }
        info!("⏳ 等待 {}ms 后开始下一批", self.pause.as_millis());
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(self.pause) => {}
        }
    }
}
