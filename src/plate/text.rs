//! 车牌文本
//!
//! 当前没有真正的文字识别：[`PlaceholderReader`] 只生成形如车牌的随机字符串，
//! 不读取图像内容。接入 OCR 时实现 [`PlateReader`] 替换即可。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::STATE_CODE_LEN;
use crate::plate::image::PixelBuffer;

pub trait PlateReader {
    /// 读取裁剪后的车牌区域，返回识别出的文本（可能为空）
    fn read(&mut self, crop: &PixelBuffer) -> String;
}

/// 占位车牌文本生成器
///
/// 生成 `AA00AA0000` 格式的随机字符串：两位字母、两位数字、两位字母、四位数字。
#[derive(Debug, Clone)]
pub struct PlaceholderReader {
    rng: StdRng,
}

impl PlaceholderReader {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 固定种子，输出可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn letter(&mut self) -> char {
        self.rng.gen_range(b'A'..=b'Z') as char
    }

    fn digit(&mut self) -> char {
        self.rng.gen_range(b'0'..=b'9') as char
    }
}

impl Default for PlaceholderReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PlateReader for PlaceholderReader {
    fn read(&mut self, _crop: &PixelBuffer) -> String {
        let mut plate = String::with_capacity(10);
        for _ in 0..2 {
            plate.push(self.letter());
        }
        for _ in 0..2 {
            plate.push(self.digit());
        }
        for _ in 0..2 {
            plate.push(self.letter());
        }
        for _ in 0..4 {
            plate.push(self.digit());
        }
        plate
    }
}

/// 只保留 ASCII 字母和数字，并转为大写
pub fn clean_plate_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// 车牌前两位（地区代码），不足两位时返回 `None`
pub fn state_code(plate: &str) -> Option<String> {
    let prefix: String = plate.chars().take(STATE_CODE_LEN).collect();
    (prefix.chars().count() == STATE_CODE_LEN).then_some(prefix)
}
