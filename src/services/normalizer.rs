//! 坐标归一化 - 业务能力层
//!
//! 把任意坐标系的轨迹缩放到 0-100 的固定坐标系，长边对应 100。

use crate::models::point::{Point, Trace};

/// 归一化后长边的长度
pub const NORMALIZED_SPAN: f64 = 100.0;

/// 归一化一条轨迹
///
/// - 空轨迹原样返回
/// - 所有点重合（包围盒跨度为 0）时无法缩放，原样返回
/// - 其余情况先平移到原点，再按 `span / 100` 缩放并四舍五入
pub fn normalize(points: &[Point]) -> Trace {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let span = (max_x - min_x).max(max_y - min_y);
    if span == 0.0 {
        return points.to_vec();
    }

    let scale = span / NORMALIZED_SPAN;
    points
        .iter()
        .map(|p| Point::new(((p.x - min_x) / scale).round(), ((p.y - min_y) / scale).round()))
        .collect()
}
