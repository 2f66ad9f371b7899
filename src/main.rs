use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use plate_scan::config::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};
use plate_scan::plate::{Alert, PlateReading, draw_plate, load_image, navigation_params};
use plate_scan::{BoxUnits, ImageSource, ModelHandle, PlateDetector, ScanError, Scanner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Units {
    /// [0, 1] 归一化坐标
    Normalized,
    /// 模型输入像素坐标
    Input,
}

impl From<Units> for BoxUnits {
    fn from(units: Units) -> Self {
        match units {
            Units::Normalized => BoxUnits::Normalized,
            Units::Input => BoxUnits::InputPixels,
        }
    }
}

/// 车牌扫描命令行
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ONNX 模型文件路径
    #[arg(long, value_name = "FILE")]
    model: PathBuf,

    /// 图像来源：文件路径或 file:// URI
    #[arg(long, value_name = "SOURCE", conflicts_with = "base64", required_unless_present = "base64")]
    input: Option<String>,

    /// 包含 base64 图像（可带 data URI 前缀）的文本文件
    #[arg(long, value_name = "FILE")]
    base64: Option<PathBuf>,

    /// 置信度阈值 (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD, value_name = "THRESHOLD")]
    confidence: f32,

    /// 模型输入宽度
    #[arg(long, default_value_t = DEFAULT_INPUT_WIDTH)]
    width: usize,

    /// 模型输入高度
    #[arg(long, default_value_t = DEFAULT_INPUT_HEIGHT)]
    height: usize,

    /// 模型输出边界框的坐标单位
    #[arg(long, value_enum, default_value_t = Units::Normalized)]
    box_units: Units,

    /// 将绘制了车牌框的图像保存到该路径（仅 --input）
    #[arg(long, value_name = "OUTPUT")]
    annotate: Option<PathBuf>,
}

/// 输出检测结果
///
/// 未检测到车牌时输出 NOT_FOUND，其他错误向上返回。
fn report(result: std::result::Result<PlateReading, ScanError>) -> Result<Option<PlateReading>> {
    match result {
        Ok(reading) => {
            println!("{}", reading.to_json());
            Ok(Some(reading))
        }
        Err(ScanError::NoDetection) => {
            println!("{}", PlateReading::not_found_json());
            Ok(None)
        }
        Err(err) => {
            let alert = Alert::from_error(&err);
            error!("{}: {} ({})", alert.title, alert.message, err);
            Err(err.into())
        }
    }
}

fn annotate(source: &ImageSource, reading: &PlateReading, output: &Path) -> Result<()> {
    let image = load_image(&source.path()?)?;
    draw_plate(&image, &reading.bbox)?.save(output)?;
    info!("结果已保存到: {}", output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("模型文件路径: {}", args.model.display());
    info!("置信度阈值: {}", args.confidence);

    let model = ModelHandle::new(&args.model);
    let detector = PlateDetector::new(model, args.width, args.height)
        .with_confidence_threshold(args.confidence)
        .with_box_units(args.box_units.into());

    if let Some(path) = &args.base64 {
        let payload = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取 {}", path.display()))?;
        let mut detector = detector;
        report(detector.detect_base64(&payload))?;
        return Ok(());
    }

    let input = args.input.as_deref().context("缺少 --input")?;
    let source = ImageSource::parse(input)?;
    let scanner = Scanner::new(detector);

    if let Some(reading) = report(scanner.scan(source.clone()).await)? {
        info!("页面参数: {}", navigation_params(&reading.plate));
        if let Some(output) = &args.annotate {
            annotate(&source, &reading, output)?;
        }
    }

    Ok(())
}
