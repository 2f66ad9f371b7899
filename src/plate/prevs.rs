use ndarray::Array4;

use crate::error::{Result, ScanError};
use crate::plate::codec::decode_payload;
use crate::plate::image::{PixelBuffer, decode_jpeg};

/// 最近邻缩放
///
/// 对每个目标像素 `(dx, dy)`，取源像素 `(dx * src_w / dst_w, dy * src_h / dst_h)`（向下取整），
/// 复制全部四个通道。不做插值，大比例缩放时会出现锯齿。
///
/// # 参数
/// * `src` - 原始图像
/// * `width` - 目标宽度
/// * `height` - 目标高度
///
/// # 错误处理
/// 源图像为空而目标尺寸非零时返回 `ScanError::EmptyImage`
///
/// # 示例
///
/// ```
/// use plate_scan::plate::image::PixelBuffer;
/// use plate_scan::plate::prevs::resize_nearest;
///
/// let src = PixelBuffer::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
/// let dst = resize_nearest(&src, 4, 2).unwrap();
/// assert_eq!(dst.pixel(1, 1), Some([255, 0, 0, 255]));
/// assert_eq!(dst.pixel(2, 0), Some([0, 0, 255, 255]));
/// ```
pub fn resize_nearest(src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return PixelBuffer::from_raw(width, height, Vec::new());
    }
    if src.width() == 0 || src.height() == 0 {
        return Err(ScanError::EmptyImage {
            width: src.width(),
            height: src.height(),
        });
    }

    let (src_w, src_h) = (src.width() as u64, src.height() as u64);
    let src_bytes = src.as_bytes();
    let channels = PixelBuffer::CHANNELS;
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);

    for dy in 0..height as u64 {
        let sy = dy * src_h / height as u64;
        let row = sy as usize * src_w as usize;
        for dx in 0..width as u64 {
            let sx = dx * src_w / width as u64;
            let offset = (row + sx as usize) * channels;
            data.extend_from_slice(&src_bytes[offset..offset + channels]);
        }
    }

    PixelBuffer::from_raw(width, height, data)
}

/// 将图像转换为模型输入张量
///
/// 像素值归一化到 [0, 1]，丢弃 alpha 通道，按 R、G、B 交错排列。
/// 返回形状为 (1, height, width, 3) 的 NHWC 张量，标准布局下展开顺序即逐像素 RGB。
pub fn pixels_to_tensor(img: &PixelBuffer) -> Result<Array4<f32>> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data: Vec<f32> = img
        .as_bytes()
        .chunks_exact(PixelBuffer::CHANNELS)
        .flat_map(|p| [p[0], p[1], p[2]])
        .map(|v| v as f32 / 255.0)
        .collect();
    Ok(Array4::from_shape_vec((1, h, w, 3), data)?)
}

/// 缩放到模型尺寸并转换为张量
pub fn prepare_input(img: &PixelBuffer, input_width: usize, input_height: usize) -> Result<Array4<f32>> {
    let resized = resize_nearest(img, input_width as u32, input_height as u32)?;
    pixels_to_tensor(&resized)
}

/// 将 base64 编码的 JPEG 转换为模型输入张量
///
/// # 参数
/// * `base64` - base64 文本，可带 data URI 前缀
/// * `input_width` - 模型输入宽度
/// * `input_height` - 模型输入高度
///
/// # 返回值
/// 元素个数恰为 `input_width * input_height * 3` 的张量
pub fn image_to_tensor(base64: &str, input_width: usize, input_height: usize) -> Result<Array4<f32>> {
    let bytes = decode_payload(base64)?;
    let img = decode_jpeg(&bytes)?;
    prepare_input(&img, input_width, input_height)
}
