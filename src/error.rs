//! 错误类型
//!
//! 整个扫描流程只有一个错误枚举，`NoDetection` 与基础设施故障（IO、解码、推理）区分开，
//! 方便上层给出"手动输入"的提示。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("Base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("图像解码失败: {0}")]
    Image(#[from] image::ImageError),

    #[error("模型错误: {0}")]
    Model(#[from] ort::Error),

    #[error("张量形状错误: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// 模型输出长度不足以容纳声明的检测数量
    #[error("模型输出格式错误: 需要至少 {expected} 个元素, 实际 {actual} 个")]
    MalformedOutput { expected: usize, actual: usize },

    #[error("未检测到车牌")]
    NoDetection,

    #[error("图像为空 ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("无效的图像来源: {0}")]
    InvalidSource(String),

    #[error("已有扫描正在进行")]
    Busy,

    #[error("模型会话锁已损坏")]
    ModelPoisoned,
}

impl ScanError {
    /// 是否属于"没有找到车牌"这一类业务结果，而非系统故障
    pub fn is_no_detection(&self) -> bool {
        matches!(self, ScanError::NoDetection)
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
