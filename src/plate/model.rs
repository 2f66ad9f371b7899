use once_cell::sync::OnceCell;
use ort::session::{Session, builder::GraphOptimizationLevel};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{Result, ScanError};

/// 加载车牌检测模型
///
/// 加载ONNX格式的模型，并应用优化配置。
///
/// # 参数
/// * `model_path` - 模型文件路径
///
/// # 错误处理
/// 文件不存在或格式错误时由 ONNX Runtime 返回 `Err`
pub fn load_model(model_path: &Path) -> std::result::Result<Session, ort::Error> {
    let model = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(4)?
        .commit_from_file(model_path)?;
    Ok(model)
}

/// 延迟加载的模型句柄
///
/// 首次调用 [`ModelHandle::session`] 时加载模型，之后一直复用同一个会话。
/// 句柄由调用方持有并注入检测器，随句柄一起释放。
pub struct ModelHandle {
    path: PathBuf,
    session: OnceCell<Mutex<Session>>,
}

impl ModelHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.session.get().is_some()
    }

    /// 取得模型会话，必要时先加载
    pub fn session(&self) -> Result<MutexGuard<'_, Session>> {
        let cell = self.session.get_or_try_init(|| {
            info!("加载模型文件: {}", self.path.display());
            let session = load_model(&self.path)?;
            debug!(
                "模型输入: {:?}, 输出: {:?}",
                session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
                session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>()
            );
            Ok::<_, ScanError>(Mutex::new(session))
        })?;
        cell.lock().map_err(|_| ScanError::ModelPoisoned)
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
