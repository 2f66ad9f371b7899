use crate::plate::image::PixelBuffer;

/// 边界框结构
///
/// 左上角 (x1, y1)，右下角 (x2, y2)。单位取决于来源：模型原始输出或源图像像素。
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).abs()
    }

    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// 将模型输出坐标换算为源图像像素坐标
    ///
    /// # 参数
    /// * `units` - 模型输出坐标的单位
    /// * `img_width` / `img_height` - 源图像尺寸
    /// * `input_width` / `input_height` - 模型输入尺寸
    pub fn to_image_space(
        &self,
        units: BoxUnits,
        img_width: u32,
        img_height: u32,
        input_width: usize,
        input_height: usize,
    ) -> BoundingBox {
        let (scale_x, scale_y) = match units {
            BoxUnits::Normalized => (img_width as f32, img_height as f32),
            BoxUnits::InputPixels => (
                img_width as f32 / input_width as f32,
                img_height as f32 / input_height as f32,
            ),
        };
        BoundingBox {
            x1: self.x1 * scale_x,
            y1: self.y1 * scale_y,
            x2: self.x2 * scale_x,
            y2: self.y2 * scale_y,
        }
    }

    /// 四周扩展 `padding` 像素并裁剪到图像范围内，返回 `(x, y, w, h)`
    ///
    /// 先扩展再裁剪，完全落在图像外的框得到 `None`；区域退化（宽或高为 0）时同样返回 `None`。
    pub fn padded_rect(&self, padding: u32, img_width: u32, img_height: u32) -> Option<(u32, u32, u32, u32)> {
        if [self.x1, self.y1, self.x2, self.y2].iter().any(|v| v.is_nan()) {
            return None;
        }
        let p = padding as f32;
        let (lx, hx) = (self.x1.min(self.x2).trunc(), self.x1.max(self.x2).trunc());
        let (ly, hy) = (self.y1.min(self.y2).trunc(), self.y1.max(self.y2).trunc());

        // 负数转换为 u32 时饱和到 0
        let x1 = (lx - p).max(0.0) as u32;
        let y1 = (ly - p).max(0.0) as u32;
        let x2 = (hx + p).min(img_width as f32) as u32;
        let y2 = (hy + p).min(img_height as f32) as u32;

        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some((x1, y1, x2 - x1, y2 - y1))
    }
}

/// 模型输出边界框的坐标单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxUnits {
    /// 相对于图像尺寸的 [0, 1] 坐标
    #[default]
    Normalized,
    /// 模型输入（如 640x640）上的像素坐标
    InputPixels,
}

/// 单个检测结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    /// 占位车牌文本，不来自图像识别
    pub text: String,
}

impl Detection {
    pub fn new(bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            bbox,
            confidence,
            text: String::new(),
        }
    }
}

/// 按边界框裁剪车牌区域（带边距）
pub fn crop_plate(img: &PixelBuffer, bbox: &BoundingBox, padding: u32) -> Option<PixelBuffer> {
    let (x, y, w, h) = bbox.padded_rect(padding, img.width(), img.height())?;
    img.crop(x, y, w, h)
}
