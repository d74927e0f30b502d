use anyhow::Result;
use drawing_evaluation::models::load_requests_file;
use drawing_evaluation::utils::logging;
use drawing_evaluation::{
    format_summary, validate_input_lengths, BatchProcessor, Config, EnvToken, EvaluationOutcome,
    Evaluator, HttpTransport,
};
use std::path::Path;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    logging::log_startup(&config.api_base_url, config.batch_size);

    let evaluator = Evaluator::from_config(
        HttpTransport::from_config(&config),
        EnvToken::new(config.api_token_env.clone()),
        &config,
    );

    if !evaluator.check_availability().await {
        warn!("⚠️ 评估服务当前不可用，仍将尝试评估");
    }

    // 加载待评估的请求
    let requests = load_requests_file(Path::new(&config.requests_file)).await?;
    if requests.is_empty() {
        warn!("⚠️ 没有找到待评估的请求，程序结束");
        return Ok(());
    }
    logging::log_requests_loaded(requests.len(), config.batch_size, config.batch_pause_ms);

    for (idx, request) in requests.iter().enumerate() {
        let validation = validate_input_lengths(&request.user_trace, &request.model_trace);
        for error in &validation.errors {
            warn!("[请求 {}] ⚠️ {}", idx + 1, error);
        }
    }

    let processor = BatchProcessor::from_config(evaluator, &config);
    let outcomes = processor.evaluate_batch(&requests).await;

    for (idx, outcome) in outcomes.iter().enumerate() {
        println!("\n##### 请求 {} {}", idx + 1, requests[idx].context);
        match outcome {
            EvaluationOutcome::Success { result, metadata } => {
                println!("{}", format_summary(result));
                println!(
                    "({}ms, tokens: {})",
                    metadata.processing_time_ms,
                    metadata
                        .tokens_used
                        .map_or_else(|| "-".to_string(), |t| t.to_string())
                );
            }
            EvaluationOutcome::Failure { error, .. } => {
                println!("❌ {}", error);
            }
        }
    }

    if let Some(stats) = processor.evaluator().get_statistics().await {
        info!(
            "📈 服务统计: 共 {} 次评估, 平均 {:.0}ms, tokens {}",
            stats.total_evaluations, stats.average_processing_time_ms, stats.tokens_used
        );
    }

    Ok(())
}
