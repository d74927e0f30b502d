//! 评估请求构建 - 业务能力层
//!
//! 负责把两条轨迹和练习上下文组装成：
//! - `payload`：发给后端的结构化坐标数据（`coordenadas` 字段）
//! - `instruction_text`：发给外部评估模型的提示词
//!
//! 提示词就是与评估模型之间的契约，内容和顺序必须保持稳定。

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::models::exercise::{ExerciseContext, ExpectedShape};
use crate::models::point::Point;
use crate::services::normalizer::normalize;

/// 未提供级别时的默认值
pub const DEFAULT_LEVEL: &str = "basic";
/// 未提供患者时的占位符
pub const DEFAULT_PATIENT_LABEL: &str = "anonymous-patient";
/// 未提供疗程时的占位符
pub const DEFAULT_SESSION_LABEL: &str = "unassigned-session";

/// 构建好的评估请求
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    /// 结构化坐标数据
    pub payload: JsonValue,
    /// 提示词
    pub instruction_text: String,
}

/// 构建评估请求（时间默认取当前时间）
///
/// 调用前两条轨迹都应已经通过长度校验，这里不再检查。
pub fn build_request(
    user_trace: &[Point],
    model_trace: &[Point],
    expected_shape: ExpectedShape,
    context: &ExerciseContext,
) -> BuiltRequest {
    build_request_at(user_trace, model_trace, expected_shape, context, Utc::now())
}

/// 构建评估请求，显式传入当前时间
pub fn build_request_at(
    user_trace: &[Point],
    model_trace: &[Point],
    expected_shape: ExpectedShape,
    context: &ExerciseContext,
    now: DateTime<Utc>,
) -> BuiltRequest {
    let user = normalize(user_trace);
    let model = normalize(model_trace);

    let level = context.level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let fecha = context
        .timestamp
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    let payload = json!({
        "usuario": user,
        "modelo": model,
        "ejercicio": {
            "tipo": context.exercise_type,
            "figuraEsperada": expected_shape.name(),
            "nivel": level,
        },
        "contexto": {
            "paciente": context.patient_label.as_deref().unwrap_or(DEFAULT_PATIENT_LABEL),
            "sesion": context.session_label.as_deref().unwrap_or(DEFAULT_SESSION_LABEL),
            "fecha": fecha,
        },
    });

    let instruction_text = build_instruction_text(
        &serialize_trace(&user),
        &serialize_trace(&model),
        expected_shape,
        &context.exercise_type,
        level,
    );

    debug!(
        "构建评估请求: 用户 {} 点, 模型 {} 点, 提示词 {} 字符",
        user.len(),
        model.len(),
        instruction_text.len()
    );

    BuiltRequest {
        payload,
        instruction_text,
    }
}

/// 序列化轨迹为 JSON 数组字面量
fn serialize_trace(points: &[Point]) -> String {
    // Point 只包含有限数值字段，序列化不会失败
    serde_json::to_string(points).unwrap_or_else(|_| "[]".to_string())
}

/// 构建提示词
fn build_instruction_text(
    user_json: &str,
    model_json: &str,
    expected_shape: ExpectedShape,
    exercise_type: &str,
    level: &str,
) -> String {
    format!(
        r#"You are an expert in pediatric fine motor skills assessment. Evaluate a child's freehand drawing by comparing it with a reference model.

EXERCISE:
- Type: {exercise_type}
- Expected shape: {expected_shape}
- Level: {level}

REFERENCE MODEL COORDINATES (normalized to 0-100):
{model_json}

CHILD'S DRAWING COORDINATES (normalized to 0-100):
{user_json}

INSTRUCTIONS:
1. Detect which geometric shape the child actually drew (square, circle, triangle, star, line or unknown).
2. Compare the child's drawing with the reference model: proportions, closure, corners and stroke continuity.
3. Compute the metrics: precision (how closely the stroke follows the model), coverage (how much of the model was traced) and similarity (overall resemblance).
4. Identify the main problems in the drawing, such as deviations, tremor, unclosed shapes or missing segments.
5. Generate concrete, encouraging suggestions the child can practice to improve.

Respond ONLY with a JSON object with exactly this structure:
{{
  "score": <integer from 0 to 100>,
  "analysis": "<short overall analysis>",
  "detectedShape": "<square|circle|triangle|star|line|unknown>",
  "precision": <decimal from 0 to 1>,
  "coverage": <decimal from 0 to 1>,
  "suggestions": ["<suggestion>", "..."],
  "details": {{
    "similarity": <decimal from 0 to 1>,
    "errors": ["<problem found>", "..."],
    "strengths": ["<strength>", "..."]
  }}
}}"#,
        exercise_type = exercise_type,
        expected_shape = expected_shape.name(),
        level = level,
        model_json = model_json,
        user_json = user_json,
    )
}
