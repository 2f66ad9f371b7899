// 模型输入尺寸，必须与模型期望的输入一致
pub const DEFAULT_INPUT_WIDTH: usize = 640;
pub const DEFAULT_INPUT_HEIGHT: usize = 640;

// 输出解码参数
pub const MAX_DETECTIONS: usize = 10;
pub const RECORD_STRIDE: usize = 6;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

// 车牌裁剪时四周额外保留的像素
pub const CROP_PADDING: u32 = 5;

pub const NOT_FOUND_PLATE: &str = "NOT_FOUND";
pub const STATE_CODE_LEN: usize = 2;
