use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Result, ScanError};

const FILE_SCHEME: &str = "file";

/// 图像来源
///
/// 相机拍照得到文件路径，相册选择得到 `file://` URI。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    CameraCapture(PathBuf),
    GalleryPick(Url),
}

impl ImageSource {
    /// 解析路径或 URI
    ///
    /// 以 `file:` 开头的按 URI 处理，其他 scheme 返回错误；其余按文件路径处理。
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ScanError::InvalidSource("空的图像路径".to_string()));
        }
        match Url::parse(input) {
            Ok(url) if url.scheme() == FILE_SCHEME => Ok(ImageSource::GalleryPick(url)),
            // Windows 盘符会被解析成单字母 scheme
            Ok(url) if url.scheme().len() > 1 => Err(ScanError::InvalidSource(format!(
                "不支持的 URI 方案: {}",
                url.scheme()
            ))),
            _ => Ok(ImageSource::CameraCapture(PathBuf::from(input))),
        }
    }

    /// 本地文件路径
    pub fn path(&self) -> Result<PathBuf> {
        match self {
            ImageSource::CameraCapture(path) => Ok(path.clone()),
            ImageSource::GalleryPick(url) => url
                .to_file_path()
                .map_err(|_| ScanError::InvalidSource(format!("无法转换为文件路径: {}", url))),
        }
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::CameraCapture(path.to_path_buf())
    }
}
