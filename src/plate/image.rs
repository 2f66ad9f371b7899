use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;

use crate::error::{Result, ScanError};

/// RGBA 像素缓冲区
///
/// 每个像素四个通道（R、G、B、A），每通道一个字节，按行优先存储。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub const CHANNELS: usize = 4;

    /// 由原始 RGBA 数据创建缓冲区
    ///
    /// 数据长度必须等于 `width * height * 4`，否则返回 `Err`。
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(ScanError::InvalidSource(format!(
                "像素数据长度 {} 与尺寸 {}x{} 不匹配",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 取得 `(x, y)` 处的像素，越界返回 `None`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        let p = &self.data[offset..offset + Self::CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// 裁剪出 `[x, x+w) x [y, y+h)` 区域，超出图像范围时返回 `None`
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<PixelBuffer> {
        let right = x.checked_add(w)?;
        let bottom = y.checked_add(h)?;
        if right > self.width || bottom > self.height {
            return None;
        }
        let row_len = w as usize * Self::CHANNELS;
        let mut data = Vec::with_capacity(row_len * h as usize);
        for row in y..bottom {
            let start = (row as usize * self.width as usize + x as usize) * Self::CHANNELS;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Some(PixelBuffer {
            width: w,
            height: h,
            data,
        })
    }

    pub fn into_rgba_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
    }

    /// 保存为图像文件，格式由扩展名决定
    ///
    /// 先转换为 RGB，JPEG 编码器不接受 RGBA。
    pub fn save(&self, path: &Path) -> Result<()> {
        let rgba = self.clone().into_rgba_image().ok_or_else(|| {
            ScanError::InvalidSource(format!("像素数据与尺寸 {}x{} 不匹配", self.width, self.height))
        })?;
        DynamicImage::ImageRgba8(rgba).to_rgb8().save(path)?;
        Ok(())
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        PixelBuffer {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// 解码 JPEG 字节为 RGBA 像素缓冲区
///
/// # 参数
/// * `bytes` - JPEG 文件内容
///
/// # 错误处理
/// 输入不是有效的 JPEG 时返回 `ScanError::Image`
pub fn decode_jpeg(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
    Ok(img.to_rgba8().into())
}

/// 加载图像文件
///
/// 格式由文件内容推断，不限于 JPEG。
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    if !path.exists() {
        return Err(ScanError::InvalidSource(format!(
            "图像文件不存在: {}",
            path.display()
        )));
    }
    let img = image::open(path)?;
    Ok(img.to_rgba8().into())
}
