use serde::{Deserialize, Serialize, Serializer};

/// 坐标点（输入坐标系任意，例如像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(serialize_with = "serialize_coord")]
    pub x: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// 一笔轨迹，顺序有意义
pub type Trace = Vec<Point>;

/// 整数坐标输出为 JSON 整数（`0` 而不是 `0.0`）
fn serialize_coord<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
