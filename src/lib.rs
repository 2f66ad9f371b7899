pub mod config;
pub mod error;
pub mod plate;

// 重新导出plate模块中的常用类型和函数
pub use error::ScanError;
pub use plate::{BoundingBox, BoxUnits, Detection, PixelBuffer, PlateReading};
pub use plate::{ImageSource, ModelHandle, PlateDetector, ScanOutcome, Scanner};
pub use plate::{decode_output, image_to_tensor, resize_nearest, select_best};
