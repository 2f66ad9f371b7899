use raqote::{DrawOptions, DrawTarget, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle};
use serde_json::{Value, json};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{CROP_PADDING, DEFAULT_CONFIDENCE_THRESHOLD, NOT_FOUND_PLATE};
use crate::error::{Result, ScanError};
use crate::plate::bounds::{BoundingBox, BoxUnits, crop_plate};
use crate::plate::codec::decode_payload;
use crate::plate::image::{PixelBuffer, decode_jpeg};
use crate::plate::infer::InferenceBackend;
use crate::plate::posts::{decode_output, ranked};
use crate::plate::prevs::prepare_input;
use crate::plate::text::{PlaceholderReader, PlateReader, clean_plate_text, state_code};

/// 一次扫描的最终结果
#[derive(Debug, Clone, PartialEq)]
pub struct PlateReading {
    /// 清洗后的车牌文本
    pub plate: String,
    /// 车牌前两位
    pub state: Option<String>,
    pub confidence: f32,
    /// 源图像像素坐标下的车牌位置
    pub bbox: BoundingBox,
}

impl PlateReading {
    /// `{"plate", "state", "confidence"}`，置信度保留两位小数
    pub fn to_json(&self) -> Value {
        let confidence = (self.confidence as f64 * 100.0).round() / 100.0;
        json!({
            "plate": self.plate,
            "state": self.state,
            "confidence": confidence,
        })
    }

    pub fn not_found_json() -> Value {
        json!({
            "plate": NOT_FOUND_PLATE,
            "state": Value::Null,
        })
    }
}

/// 车牌检测器
///
/// 封装了完整的检测流程：缩放、张量转换、模型推理、输出解码和车牌文本读取。
///
/// # 示例
///
/// ```no_run
/// use plate_scan::{ModelHandle, PlateDetector};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let model = ModelHandle::new("assets/plate.onnx");
/// let mut detector = PlateDetector::new(model, 640, 640)
///     .with_confidence_threshold(0.5);
/// let reading = detector.detect_base64("data:image/jpeg;base64,...")?;
/// println!("{}", reading.plate);
/// # Ok(())
/// # }
/// ```
pub struct PlateDetector<B, R = PlaceholderReader> {
    backend: B,
    reader: R,
    input_width: usize,
    input_height: usize,
    confidence_threshold: f32,
    box_units: BoxUnits,
    padding: u32,
}

impl<B: InferenceBackend> PlateDetector<B, PlaceholderReader> {
    /// 创建检测器，使用占位文本生成器
    ///
    /// # 参数
    /// * `backend` - 推理后端，通常是 [`crate::ModelHandle`]
    /// * `input_width` - 模型输入宽度
    /// * `input_height` - 模型输入高度
    pub fn new(backend: B, input_width: usize, input_height: usize) -> Self {
        Self {
            backend,
            reader: PlaceholderReader::new(),
            input_width,
            input_height,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            box_units: BoxUnits::default(),
            padding: CROP_PADDING,
        }
    }
}

impl<B: InferenceBackend, R: PlateReader> PlateDetector<B, R> {
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_box_units(mut self, units: BoxUnits) -> Self {
        self.box_units = units;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// 替换车牌文本读取器
    pub fn with_reader<R2: PlateReader>(self, reader: R2) -> PlateDetector<B, R2> {
        PlateDetector {
            backend: self.backend,
            reader,
            input_width: self.input_width,
            input_height: self.input_height,
            confidence_threshold: self.confidence_threshold,
            box_units: self.box_units,
            padding: self.padding,
        }
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn input_height(&self) -> usize {
        self.input_height
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn box_units(&self) -> BoxUnits {
        self.box_units
    }

    /// 从 base64 编码的 JPEG 检测车牌
    pub fn detect_base64(&mut self, payload: &str) -> Result<PlateReading> {
        let bytes = decode_payload(payload)?;
        let img = decode_jpeg(&bytes)?;
        self.detect(&img)
    }

    /// 完整的检测流程：从图像到车牌结果
    ///
    /// 按置信度从高到低依次尝试候选框，第一个读出非空文本的候选即为结果。
    ///
    /// # 错误处理
    /// 没有候选通过阈值时返回 `ScanError::NoDetection`；解码和推理错误原样返回
    pub fn detect(&mut self, img: &PixelBuffer) -> Result<PlateReading> {
        let start_time = Instant::now();
        let input_tensor = prepare_input(img, self.input_width, self.input_height)?;
        let output = self.backend.infer(&input_tensor)?;
        let detections = decode_output(&output, self.confidence_threshold)?;

        for det in ranked(&detections) {
            let bbox = det.bbox.to_image_space(
                self.box_units,
                img.width(),
                img.height(),
                self.input_width,
                self.input_height,
            );
            let crop = crop_plate(img, &bbox, self.padding).unwrap_or_else(|| {
                debug!("候选框 {:?} 在图像外, 使用空裁剪", bbox);
                PixelBuffer::empty()
            });

            let plate = clean_plate_text(&self.reader.read(&crop));
            if plate.is_empty() {
                debug!("候选框 {:?} 未读出文本, 尝试下一个", bbox);
                continue;
            }

            info!(
                "检测到车牌 {} (置信度 {:.2}), 处理耗时 {:?}",
                plate,
                det.confidence,
                start_time.elapsed()
            );
            return Ok(PlateReading {
                state: state_code(&plate),
                plate,
                confidence: det.confidence,
                bbox,
            });
        }

        info!("未检测到车牌, 处理耗时 {:?}", start_time.elapsed());
        Err(ScanError::NoDetection)
    }
}

/// 在图像上绘制车牌框
///
/// # 参数
/// * `image` - 源图像
/// * `bbox` - 源图像像素坐标下的车牌框
///
/// # 返回值
/// 绘制了车牌框的新图像
pub fn draw_plate(image: &PixelBuffer, bbox: &BoundingBox) -> Result<PixelBuffer> {
    let (img_width, img_height) = (image.width(), image.height());
    let mut dt = DrawTarget::new(img_width as i32, img_height as i32);

    let image_data: Vec<u32> = image
        .as_bytes()
        .chunks_exact(PixelBuffer::CHANNELS)
        .map(|pixel| u32::from_le_bytes([pixel[2], pixel[1], pixel[0], pixel[3]]))
        .collect();

    let img = raqote::Image {
        width: img_width as i32,
        height: img_height as i32,
        data: &image_data,
    };
    dt.draw_image_at(0.0, 0.0, &img, &DrawOptions::new());

    let mut pb = PathBuilder::new();
    pb.rect(bbox.x1, bbox.y1, bbox.x2 - bbox.x1, bbox.y2 - bbox.y1);
    let path = pb.finish();

    dt.stroke(
        &path,
        &Source::Solid(SolidSource {
            r: 0x00,
            g: 0xFF,
            b: 0x00,
            a: 0xFF,
        }),
        &StrokeStyle {
            join: LineJoin::Round,
            width: 3.0,
            ..StrokeStyle::default()
        },
        &DrawOptions::default(),
    );

    // BGRA -> RGBA
    let pixels: Vec<u8> = dt
        .get_data()
        .iter()
        .flat_map(|&pixel| {
            let bytes = pixel.to_le_bytes();
            [bytes[2], bytes[1], bytes[0], bytes[3]]
        })
        .collect();

    PixelBuffer::from_raw(img_width, img_height, pixels)
}
