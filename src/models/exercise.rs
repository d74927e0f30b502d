use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 期望图形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedShape {
    Square,
    Circle,
    Triangle,
    Star,
    Line,
}

impl ExpectedShape {
    /// 获取标准名称（即发送给后端的值）
    pub fn name(self) -> &'static str {
        match self {
            ExpectedShape::Square => "square",
            ExpectedShape::Circle => "circle",
            ExpectedShape::Triangle => "triangle",
            ExpectedShape::Star => "star",
            ExpectedShape::Line => "line",
        }
    }

    /// 从名称解析图形，兼容西班牙语名称
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "square" | "cuadrado" => Some(ExpectedShape::Square),
            "circle" | "circulo" | "círculo" => Some(ExpectedShape::Circle),
            "triangle" | "triangulo" | "triángulo" => Some(ExpectedShape::Triangle),
            "star" | "estrella" => Some(ExpectedShape::Star),
            "line" | "linea" | "línea" => Some(ExpectedShape::Line),
            _ => None,
        }
    }
}

impl Display for ExpectedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 练习上下文
///
/// 每个请求构造一次，之后不再修改。可选字段在构建请求时补默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseContext {
    /// 练习类型
    pub exercise_type: String,
    /// 期望图形
    pub expected_shape: ExpectedShape,
    /// 难度级别（默认 "basic"）
    #[serde(default)]
    pub level: Option<String>,
    /// 患者标识
    #[serde(default)]
    pub patient_label: Option<String>,
    /// 疗程标识
    #[serde(default)]
    pub session_label: Option<String>,
    /// 练习时间（默认当前时间）
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExerciseContext {
    pub fn new(exercise_type: impl Into<String>, expected_shape: ExpectedShape) -> Self {
        Self {
            exercise_type: exercise_type.into(),
            expected_shape,
            level: None,
            patient_label: None,
            session_label: None,
            timestamp: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_patient(mut self, patient_label: impl Into<String>) -> Self {
        self.patient_label = Some(patient_label.into());
        self
    }

    pub fn with_session(mut self, session_label: impl Into<String>) -> Self {
        self.session_label = Some(session_label.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl Display for ExerciseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[练习 {} 图形#{} 患者#{}]",
            self.exercise_type,
            self.expected_shape,
            self.patient_label.as_deref().unwrap_or("-")
        )
    }
}
