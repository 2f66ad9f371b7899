//! Plate模块 - 车牌检测流程
//!
//! 该模块提供了拍照识别车牌所需的全部非界面逻辑，包括：
//! - 图像来源解析与 base64 负载解码
//! - JPEG 解码、最近邻缩放和张量转换
//! - 模型延迟加载与推理
//! - 输出解码、置信度过滤与最优结果选择
//! - 占位车牌文本与页面流程编排
//!
//! # 工作流程
//!
//! 1. 使用 `ModelHandle::new` 指定模型文件（首次推理时加载）
//! 2. 创建 `PlateDetector` 并配置参数
//! 3. 调用 `detect` / `detect_base64` 执行检测，或交给 `Scanner` 编排
//!
//! # 示例
//!
//! ```no_run
//! use plate_scan::{ImageSource, ModelHandle, PlateDetector, Scanner, ScanOutcome};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ModelHandle::new("assets/plate.onnx");
//! let detector = PlateDetector::new(model, 640, 640).with_confidence_threshold(0.5);
//! let scanner = Scanner::new(detector);
//!
//! match scanner.run(ImageSource::parse("file:///sdcard/DCIM/car.jpg")?).await {
//!     ScanOutcome::Plate { params, .. } => println!("{}", params),
//!     ScanOutcome::Failed(alert) => eprintln!("{}: {}", alert.title, alert.message),
//! }
//! # Ok(())
//! # }
//! ```

pub mod bounds;
pub mod codec;
pub mod core;
pub mod detect;
pub mod image;
pub mod infer;
pub mod model;
pub mod posts;
pub mod prevs;
pub mod source;
pub mod text;

// 重新导出常用类型和函数
pub use self::bounds::{BoundingBox, BoxUnits, Detection};
pub use self::core::{Alert, ScanOutcome, ScanState, Scanner, navigation_params};
pub use self::detect::{PlateDetector, PlateReading, draw_plate};
pub use self::image::{PixelBuffer, decode_jpeg, load_image};
pub use self::infer::{InferenceBackend, run_inference};
pub use self::model::{ModelHandle, load_model};
pub use self::posts::{decode_output, select_best};
pub use self::prevs::{image_to_tensor, resize_nearest};
pub use self::source::ImageSource;
