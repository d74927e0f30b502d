//! 评估响应校验 - 业务能力层
//!
//! 外部评估模型返回的是不可信的自由文本，这里是唯一的信任边界：
//! 解析 → 结构检查 → 数值截断，输出一定满足 `EvaluationResult` 的取值范围。

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::evaluation::{EvaluationDetails, EvaluationResult};
use crate::utils::logging::truncate_text;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("fence regex is valid")
    })
}

/// 去掉包裹在外面的 ```json / ``` 代码块标记
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    match fence_regex().captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => {
            // 只有一侧有标记
            let body = trimmed
                .strip_prefix("```json")
                .or_else(|| trimmed.strip_prefix("```"))
                .unwrap_or(trimmed);
            body.strip_suffix("```").unwrap_or(body).trim()
        }
    }
}

/// 校验评估模型的原始输出
///
/// - 无法解析为 JSON → `ValidationError::Parse`
/// - `score` / `analysis` / `detectedShape` 缺失或为空 → `ValidationError::Schema`
/// - 数值越界不是错误，直接截断到合法范围
pub fn validate(raw_response: &str) -> Result<EvaluationResult, ValidationError> {
    let cleaned = strip_code_fences(raw_response);

    let value: JsonValue = serde_json::from_str(cleaned).map_err(|e| {
        debug!(
            "评估响应不是合法 JSON: {} (内容: {})",
            e,
            truncate_text(cleaned, 120)
        );
        ValidationError::Parse
    })?;

    // score 为 0 视为有效分数
    let score_present = value.get("score").is_some_and(|v| is_truthy(v) || is_zero(v));
    let analysis = value.get("analysis").filter(|v| is_truthy(v));
    let detected_shape = value.get("detectedShape").filter(|v| is_truthy(v));

    let (Some(analysis), Some(detected_shape)) = (analysis, detected_shape) else {
        debug!("评估响应缺少 analysis 或 detectedShape");
        return Err(ValidationError::Schema);
    };
    if !score_present {
        debug!("评估响应缺少 score");
        return Err(ValidationError::Schema);
    }

    let score = value
        .get("score")
        .and_then(as_number)
        .ok_or_else(|| {
            debug!("评估响应的 score 不是数字: {:?}", value.get("score"));
            ValidationError::Schema
        })?;

    let details = value.get("details");

    Ok(EvaluationResult {
        score: score.clamp(0.0, 100.0).round() as u8,
        analysis: as_text(analysis),
        detected_shape: as_text(detected_shape),
        precision: unit_interval(value.get("precision")),
        coverage: unit_interval(value.get("coverage")),
        suggestions: string_list(value.get("suggestions")),
        details: EvaluationDetails {
            similarity: unit_interval(details.and_then(|d| d.get("similarity"))),
            errors: string_list(details.and_then(|d| d.get("errors"))),
            strengths: string_list(details.and_then(|d| d.get("strengths"))),
        },
    })
}

/// JSON 值的真值判断（null / false / 0 / NaN / 空字符串为假）
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn is_zero(value: &JsonValue) -> bool {
    value.as_f64() == Some(0.0)
}

/// 数字或数字字符串
fn as_number(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 截断到 [0, 1]，缺失或非数字时为 0
fn unit_interval(value: Option<&JsonValue>) -> f64 {
    value.and_then(as_number).map_or(0.0, |n| n.clamp(0.0, 1.0))
}

/// 非数组时返回空列表，非字符串元素转成字符串
fn string_list(value: Option<&JsonValue>) -> Vec<String> {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(as_text)
            .collect(),
        _ => Vec::new(),
    }
}
