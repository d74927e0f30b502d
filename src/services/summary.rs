//! 评估结果摘要 - 业务能力层
//!
//! 把已校验的结果渲染成给人看的文本，不做任何校验。

use crate::models::evaluation::EvaluationResult;

/// 渲染评估摘要
pub fn format_summary(result: &EvaluationResult) -> String {
    let mut out = String::from("=== OVERALL RESULT ===\n");
    out.push_str(&format!("Score: {}/100\n", result.score));
    out.push_str(&format!("Detected shape: {}\n", result.detected_shape));
    out.push_str(&format!("Precision: {}\n", percent(result.precision)));
    out.push_str(&format!("Coverage: {}\n", percent(result.coverage)));
    out.push_str(&format!("Similarity: {}\n", percent(result.details.similarity)));

    out.push_str("\n=== ANALYSIS ===\n");
    out.push_str(&result.analysis);
    out.push('\n');

    push_section(&mut out, "STRENGTHS", &result.details.strengths);
    push_section(&mut out, "AREAS FOR IMPROVEMENT", &result.details.errors);
    push_section(&mut out, "SUGGESTIONS", &result.suggestions);

    out
}

fn push_section(out: &mut String, heading: &str, items: &[String]) {
    out.push_str(&format!("\n=== {} ===\n", heading));
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in items {
        out.push_str(&format!("• {}\n", item));
    }
}

fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}
