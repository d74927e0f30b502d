//! 输入长度校验
//!
//! 在发送之前检查两条轨迹的点数，不合法的请求不会到达外部服务。

use serde::Serialize;

use crate::models::point::Point;

/// 可评估轨迹的最少点数
pub const MIN_POINTS: usize = 3;
/// 可评估轨迹的最多点数
pub const MAX_POINTS: usize = 500;

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputValidation {
    pub valid: bool,
    /// 按顺序累积的错误（先用户轨迹，后模型轨迹）
    pub errors: Vec<String>,
}

/// 校验两条轨迹的长度，所有错误都会被收集，不会提前返回
pub fn validate_input_lengths(user_trace: &[Point], model_trace: &[Point]) -> InputValidation {
    let mut errors = Vec::new();

    check_trace("User trace", user_trace.len(), &mut errors);
    check_trace("Model trace", model_trace.len(), &mut errors);

    InputValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_trace(label: &str, len: usize, errors: &mut Vec<String>) {
    if len < MIN_POINTS {
        errors.push(format!(
            "{} has too few points ({}, minimum {})",
            label, len, MIN_POINTS
        ));
    } else if len > MAX_POINTS {
        errors.push(format!(
            "{} has too many points ({}, maximum {})",
            label, len, MAX_POINTS
        ));
    }
}
