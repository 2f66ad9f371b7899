use ndarray::Array4;
use ort::{inputs, value::Tensor};
use std::time::Instant;
use tracing::debug;

use crate::error::Result;
use crate::plate::model::ModelHandle;

/// 推理后端
///
/// 接收 NHWC 输入张量，返回模型的原始输出数组（展平）。
pub trait InferenceBackend {
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

impl<T: InferenceBackend + ?Sized> InferenceBackend for &T {
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        (**self).infer(input)
    }
}

impl<T: InferenceBackend + ?Sized> InferenceBackend for std::sync::Arc<T> {
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        (**self).infer(input)
    }
}

/// 运行模型推理
///
/// 输入张量形状应为 (1, height, width, 3)。只读取第一个输出，按元素顺序展平返回。
pub fn run_inference(model: &ModelHandle, input: &Array4<f32>) -> Result<Vec<f32>> {
    let shape: Vec<usize> = input.shape().to_vec();
    let data: Vec<f32> = input.iter().copied().collect();
    let input_tensor = Tensor::from_array(([shape[0], shape[1], shape[2], shape[3]], data))?;

    let mut session = model.session()?;
    let start_time = Instant::now();
    let outputs = session.run(inputs![input_tensor])?;
    debug!("模型推理耗时: {:?}", start_time.elapsed());

    let (out_shape, out_data) = outputs[0].try_extract_tensor::<f32>()?;
    debug!("模型输出形状: {:?}", out_shape);
    Ok(out_data.to_vec())
}

impl InferenceBackend for ModelHandle {
    fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        run_inference(self, input)
    }
}
