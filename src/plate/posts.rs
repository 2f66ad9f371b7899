//! 模型输出后处理
//!
//! 原始输出的第 0 个元素是检测数量，之后每 6 个数为一条记录：
//! `[x1, y1, x2, y2, confidence, 保留]`。

use tracing::{debug, warn};

use crate::config::{MAX_DETECTIONS, RECORD_STRIDE};
use crate::error::{Result, ScanError};
use crate::plate::bounds::{BoundingBox, Detection};

/// 读取输出声明的检测数量，最多 `MAX_DETECTIONS` 条
fn detection_count(raw: f32) -> usize {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let count = raw.floor() as usize;
    if count > MAX_DETECTIONS {
        debug!("模型声明 {} 个检测, 截断为 {}", count, MAX_DETECTIONS);
    }
    count.min(MAX_DETECTIONS)
}

/// 解码模型输出并按置信度过滤
///
/// # 参数
/// * `output` - 模型原始输出
/// * `confidence_threshold` - 置信度阈值，只保留严格大于该值的记录
///
/// # 返回值
/// 按输出顺序排列的检测结果，可能为空
///
/// # 错误处理
/// 输出为空，或长度不足以容纳声明的记录数时返回 `ScanError::MalformedOutput`
///
/// # 示例
///
/// ```
/// use plate_scan::plate::posts::decode_output;
///
/// let output = [1.0, 0.1, 0.2, 0.3, 0.4, 0.9, 0.0];
/// let detections = decode_output(&output, 0.5).unwrap();
/// assert_eq!(detections.len(), 1);
/// assert_eq!(detections[0].confidence, 0.9);
/// ```
pub fn decode_output(output: &[f32], confidence_threshold: f32) -> Result<Vec<Detection>> {
    let Some(&raw_count) = output.first() else {
        return Err(ScanError::MalformedOutput {
            expected: 1,
            actual: 0,
        });
    };

    let count = detection_count(raw_count);
    let expected = 1 + count * RECORD_STRIDE;
    if output.len() < expected {
        warn!("模型输出长度 {} 小于声明所需的 {}", output.len(), expected);
        return Err(ScanError::MalformedOutput {
            expected,
            actual: output.len(),
        });
    }

    let detections: Vec<Detection> = output[1..expected]
        .chunks_exact(RECORD_STRIDE)
        .filter(|record| record[4] > confidence_threshold)
        .map(|record| {
            Detection::new(
                BoundingBox::new(record[0], record[1], record[2], record[3]),
                record[4],
            )
        })
        .collect();

    debug!("候选 {} 条, 通过阈值 {} 条", count, detections.len());
    Ok(detections)
}

/// 选出置信度最高的检测结果
///
/// 置信度相同时保留先出现的一条。
pub fn select_best(detections: &[Detection]) -> Option<&Detection> {
    detections.iter().fold(None, |best, det| match best {
        Some(b) if det.confidence <= b.confidence => Some(b),
        _ => Some(det),
    })
}

/// 按置信度降序排列的候选顺序（稳定排序，同分保持原顺序）
pub fn ranked(detections: &[Detection]) -> Vec<&Detection> {
    let mut ranked: Vec<&Detection> = detections.iter().collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_floored_and_clamped() {
        assert_eq!(detection_count(2.7), 2);
        assert_eq!(detection_count(40.0), MAX_DETECTIONS);
        assert_eq!(detection_count(-3.0), 0);
        assert_eq!(detection_count(f32::NAN), 0);
    }
}
