use crate::models::evaluation::EvaluationRequest;
use crate::models::exercise::{ExerciseContext, ExpectedShape};
use crate::models::point::Trace;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 批量评估文件
#[derive(Debug, Deserialize)]
struct BatchFile {
    #[serde(default)]
    evaluations: Vec<RequestEntry>,
}

/// 文件中的单条评估
#[derive(Debug, Deserialize)]
struct RequestEntry {
    exercise_type: String,
    expected_shape: String,
    level: Option<String>,
    patient_label: Option<String>,
    session_label: Option<String>,
    timestamp: Option<String>,
    #[serde(default)]
    user_trace: Trace,
    #[serde(default)]
    model_trace: Trace,
}

impl RequestEntry {
    fn into_request(self, index: usize) -> Result<EvaluationRequest> {
        let expected_shape = ExpectedShape::from_name(&self.expected_shape).with_context(|| {
            format!("第 {} 条评估的图形无法识别: {}", index + 1, self.expected_shape)
        })?;

        let timestamp = self
            .timestamp
            .as_deref()
            .map(|ts| {
                DateTime::parse_from_rfc3339(ts)
                    .map(|dt| dt.with_timezone(&Utc))
                    .with_context(|| format!("第 {} 条评估的时间格式错误: {}", index + 1, ts))
            })
            .transpose()?;

        let context = ExerciseContext {
            exercise_type: self.exercise_type,
            expected_shape,
            level: self.level,
            patient_label: self.patient_label,
            session_label: self.session_label,
            timestamp,
        };

        Ok(EvaluationRequest::new(self.user_trace, self.model_trace, context))
    }
}

/// 解析 TOML 文本为评估请求列表（保持文件中的顺序）
pub fn parse_requests(content: &str) -> Result<Vec<EvaluationRequest>> {
    let file: BatchFile = toml::from_str(content).context("无法解析评估TOML")?;

    file.evaluations
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| entry.into_request(idx))
        .collect()
}

/// 从 TOML 文件加载评估请求列表
pub async fn load_requests_file(path: &Path) -> Result<Vec<EvaluationRequest>> {
    if !path.exists() {
        anyhow::bail!("文件不存在: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", path.display()))?;

    let requests = parse_requests(&content)
        .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 条评估请求", requests.len());

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[evaluations]]
exercise_type = "copy-figure"
expected_shape = "cuadrado"
patient_label = "P-001"
timestamp = "2026-10-19T10:00:00Z"
user_trace = [{ x = 0.0, y = 0.0 }, { x = 10.0, y = 0.0 }, { x = 10.0, y = 10.0 }]
model_trace = [{ x = 0.0, y = 0.0 }, { x = 20.0, y = 0.0 }, { x = 20.0, y = 20.0 }]

[[evaluations]]
exercise_type = "copy-figure"
expected_shape = "line"
"#;

    #[test]
    fn test_parse_requests_keeps_order_and_defaults() {
        let requests = parse_requests(SAMPLE).unwrap();
        assert_eq!(requests.len(), 2);

        let first = &requests[0];
        assert_eq!(first.context.expected_shape, ExpectedShape::Square);
        assert_eq!(first.context.patient_label.as_deref(), Some("P-001"));
        assert_eq!(first.user_trace.len(), 3);
        assert!(first.context.timestamp.is_some());

        let second = &requests[1];
        assert_eq!(second.context.expected_shape, ExpectedShape::Line);
        assert!(second.user_trace.is_empty());
        assert!(second.context.level.is_none());
    }

    #[test]
    fn test_parse_requests_rejects_unknown_shape() {
        let content = r#"
[[evaluations]]
exercise_type = "copy-figure"
expected_shape = "hexagon"
"#;
        assert!(parse_requests(content).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_requests_file(Path::new("does/not/exist.toml")).await;
        assert!(result.is_err());
    }
}
