use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::{Result, ScanError};
use crate::plate::codec::encode_payload;
use crate::plate::detect::{PlateDetector, PlateReading};
use crate::plate::infer::InferenceBackend;
use crate::plate::source::ImageSource;
use crate::plate::text::{PlaceholderReader, PlateReader, clean_plate_text, state_code};

/// 扫描流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ScanState {
    Idle = 0,
    Capturing = 1,
    Processing = 2,
}

impl From<u8> for ScanState {
    fn from(v: u8) -> Self {
        match v {
            1 => ScanState::Capturing,
            2 => ScanState::Processing,
            _ => ScanState::Idle,
        }
    }
}

/// 面向用户的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    const GENERIC_MESSAGE: &'static str = "处理图像失败，请重试。";

    /// 所有处理失败都汇总为一个提示；未检测到车牌时建议手动输入
    ///
    /// IO、模型与张量错误对用户没有意义，只给出通用提示，原始错误由调用方记录到日志。
    pub fn from_error(err: &ScanError) -> Self {
        match err {
            ScanError::NoDetection => Alert {
                title: "未检测到车牌".to_string(),
                message: "请重新拍摄，或手动输入车牌号。".to_string(),
            },
            ScanError::Busy => Alert {
                title: "请稍候".to_string(),
                message: "正在处理上一张图像。".to_string(),
            },
            ScanError::Io(_) | ScanError::Model(_) | ScanError::Shape(_) | ScanError::ModelPoisoned => Alert {
                title: "错误".to_string(),
                message: Self::GENERIC_MESSAGE.to_string(),
            },
            other => Alert {
                title: "错误".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// 一次扫描的结果
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// 成功，`params` 交给下一个页面
    Plate { reading: PlateReading, params: Value },
    /// 失败，回到空闲状态
    Failed(Alert),
}

/// 下一个页面的参数：完整车牌与两位前缀
pub fn navigation_params(plate: &str) -> Value {
    let plate = clean_plate_text(plate);
    let prefix = state_code(&plate).unwrap_or_default();
    json!({
        "plate": plate,
        "prefix": prefix,
    })
}

/// 扫描期间持有，离开作用域时回到空闲状态
struct InFlight<'a> {
    busy: &'a AtomicBool,
    state: &'a AtomicU8,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.store(ScanState::Idle as u8, Ordering::Release);
        self.busy.store(false, Ordering::Release);
    }
}

/// 扫描页面的流程编排
///
/// 同一时刻只允许一次 拍摄 -> 处理 流程；重入调用返回 `ScanError::Busy`。
/// 推理一旦开始不能取消，也没有超时。
pub struct Scanner<B, R = PlaceholderReader> {
    detector: Mutex<PlateDetector<B, R>>,
    busy: AtomicBool,
    state: AtomicU8,
}

impl<B: InferenceBackend, R: PlateReader> Scanner<B, R> {
    pub fn new(detector: PlateDetector<B, R>) -> Self {
        Self {
            detector: Mutex::new(detector),
            busy: AtomicBool::new(false),
            state: AtomicU8::new(ScanState::Idle as u8),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state.load(Ordering::Acquire).into()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::Busy)?;
        self.state.store(ScanState::Capturing as u8, Ordering::Release);
        Ok(InFlight {
            busy: &self.busy,
            state: &self.state,
        })
    }

    /// 读取图像并检测车牌
    pub async fn scan(&self, source: ImageSource) -> Result<PlateReading> {
        let _in_flight = self.begin()?;
        info!("开始扫描: {:?}", source);
        // 让出一次，界面可先刷新拍摄状态
        tokio::task::yield_now().await;

        let path = source.path()?;
        let bytes = tokio::fs::read(&path).await?;
        let payload = encode_payload(&bytes);

        self.state.store(ScanState::Processing as u8, Ordering::Release);
        let mut detector = self.detector.lock().await;
        detector.detect_base64(&payload)
    }

    /// 扫描并把结果转换为页面可用的结果或提示
    pub async fn run(&self, source: ImageSource) -> ScanOutcome {
        match self.scan(source).await {
            Ok(reading) => {
                let params = navigation_params(&reading.plate);
                ScanOutcome::Plate { reading, params }
            }
            Err(err) => {
                match &err {
                    ScanError::NoDetection => warn!("未检测到车牌"),
                    ScanError::Busy => warn!("扫描进行中, 忽略本次请求"),
                    other => error!("扫描失败: {}", other),
                }
                ScanOutcome::Failed(Alert::from_error(&err))
            }
        }
    }
}
