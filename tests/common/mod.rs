#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;

use plate_scan::error::Result;
use plate_scan::plate::InferenceBackend;
use plate_scan::plate::text::PlateReader;
use plate_scan::PixelBuffer;

/// 生成一张带渐变的 JPEG
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// 写入临时目录，返回文件路径
pub fn write_jpeg(name: &str, width: u32, height: u32) -> PathBuf {
    let path = std::env::temp_dir().join(format!("plate-scan-{}-{}.jpg", std::process::id(), name));
    std::fs::write(&path, jpeg_bytes(width, height)).unwrap();
    path
}

/// 返回固定输出的推理后端，记录每次输入的形状
pub struct ScriptedBackend {
    output: Vec<f32>,
    pub shapes: Mutex<Vec<Vec<usize>>>,
}

impl ScriptedBackend {
    pub fn new(output: Vec<f32>) -> Self {
        Self {
            output,
            shapes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.shapes.lock().unwrap().len()
    }
}

impl InferenceBackend for ScriptedBackend {
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        self.shapes.lock().unwrap().push(input.shape().to_vec());
        Ok(self.output.clone())
    }
}

/// 按顺序返回预设文本的读取器
pub struct ScriptedReader {
    texts: VecDeque<String>,
    pub crops: Vec<(u32, u32)>,
}

impl ScriptedReader {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            crops: Vec::new(),
        }
    }
}

impl PlateReader for ScriptedReader {
    fn read(&mut self, crop: &PixelBuffer) -> String {
        self.crops.push((crop.width(), crop.height()));
        self.texts.pop_front().unwrap_or_default()
    }
}

/// 拼出模型原始输出：数量 + 每条 `[x1, y1, x2, y2, conf, 0]`
pub fn raw_output(records: &[[f32; 5]]) -> Vec<f32> {
    let mut out = vec![records.len() as f32];
    for r in records {
        out.extend_from_slice(r);
        out.push(0.0);
    }
    out
}
