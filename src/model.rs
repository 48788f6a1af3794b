use std::path::{Path, PathBuf};

use crate::{
    errors::{BgRemoveError, Result},
    traits::MaskModel,
};
use image::{imageops, imageops::FilterType, DynamicImage, GrayImage};
use ndarray::prelude::*;
use nshare::AsNdarray3;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
#[cfg(feature = "tensorrt")]
use ort::execution_providers::TensorRTExecutionProvider;
use ort::{
    session::{builder::SessionBuilder, Session},
    value::TensorRef,
};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Side length of the square U^2-Net input.
pub const IMAGE_SIZE: u32 = 320;

const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// U^2-Net salient object detection through ONNX Runtime.
///
/// The session is committed on the first prediction, so constructing the
/// model never touches the filesystem.
pub struct U2Net {
    model_path: PathBuf,
    session: Mutex<Option<Session>>,
}

impl U2Net {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            session: Mutex::new(None),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn is_loaded(&self) -> bool {
        self.session.lock().is_some()
    }

    fn load(model_path: &Path) -> Result<Session> {
        if !model_path.is_file() {
            return Err(BgRemoveError::model(
                format!("model file lookup: {}", model_path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "model file does not exist"),
            ));
        }

        let builder = SessionBuilder::new()
            .map_err(|e| BgRemoveError::model("session builder init", e))?;
        #[cfg(any(feature = "cuda", feature = "tensorrt"))]
        let builder = builder
            .with_execution_providers(execution_providers())
            .map_err(|e| BgRemoveError::model("execution provider setup", e))?;

        builder
            .with_memory_pattern(true)
            .map_err(|e| BgRemoveError::model("memory pattern setup", e))?
            .commit_from_file(model_path)
            .map_err(|e| {
                BgRemoveError::model(format!("model file load: {}", model_path.display()), e)
            })
    }

    pub fn predict(&self, tensor: ArrayView4<f32>) -> Result<Array4<f32>> {
        let mut binding = self.session.lock();
        if binding.is_none() {
            info!(path = %self.model_path.display(), "loading U^2-Net model");
            *binding = Some(Self::load(&self.model_path)?);
        }
        let session = binding
            .as_mut()
            .ok_or_else(|| BgRemoveError::model("session access", "session is not initialized"))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| BgRemoveError::model("model input lookup", "model has no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| BgRemoveError::model("model output lookup", "model has no outputs"))?;

        debug!(input = %input_name, output = %output_name, shape = ?tensor.shape(), "running inference");
        let outputs = session.run(ort::inputs![
            input_name.as_str() => TensorRef::from_array_view(&tensor.as_standard_layout())?
        ])?;
        Ok(outputs[output_name.as_str()]
            .try_extract_array::<f32>()?
            .into_dimensionality::<Ix4>()?
            .to_owned())
    }
}

impl MaskModel for U2Net {
    fn predict_mask(&self, img: &DynamicImage) -> Result<GrayImage> {
        let tensor = preprocess(img);
        let mask = self.predict(tensor.view())?;
        postprocess_mask(mask.view(), img.width(), img.height())
    }
}

#[cfg(any(feature = "cuda", feature = "tensorrt"))]
fn execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    let mut providers = Vec::new();
    #[cfg(feature = "tensorrt")]
    providers.push(TensorRTExecutionProvider::default().build());
    #[cfg(feature = "cuda")]
    providers.push(CUDAExecutionProvider::default().build());
    providers
}

/// Builds the `1x3x320x320` input tensor.
///
/// The image is resized with Lanczos3, scaled by its brightest subpixel and
/// normalized with the ImageNet mean and std.
pub fn preprocess(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, IMAGE_SIZE, IMAGE_SIZE, FilterType::Lanczos3);

    let tensor = resized.as_ndarray3().mapv(f32::from);
    let max = tensor.fold(0.0_f32, |acc, &v| acc.max(v)).max(1e-6);
    let mut tensor = tensor / max;

    for ((mut channel, mean), std) in tensor
        .axis_iter_mut(Axis(0))
        .zip(MEAN.iter())
        .zip(STD.iter())
    {
        channel.mapv_inplace(|v| (v - mean) / std);
    }

    tensor.insert_axis(Axis(0))
}

/// Turns the raw prediction into a mask of `width x height`.
///
/// The first channel is min-max normalized to `0..=255`. A flat prediction
/// carries no foreground information and becomes an all-background mask.
pub fn postprocess_mask(mask: ArrayView4<f32>, width: u32, height: u32) -> Result<GrayImage> {
    let (batch, channels, mask_height, mask_width) = mask.dim();
    if batch == 0 || channels == 0 {
        return Err(BgRemoveError::model(
            "mask postprocessing",
            format!("unexpected prediction shape {:?}", mask.shape()),
        ));
    }

    let pred = mask.slice(s![0, 0, .., ..]);
    let (min, max) = pred.fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
        (min.min(v), max.max(v))
    });
    let range = max - min;

    let pixels = pred
        .iter()
        .map(|&v| {
            if range > f32::EPSILON {
                ((v - min) / range * 255.0) as u8
            } else {
                0
            }
        })
        .collect::<Vec<u8>>();

    let mask = GrayImage::from_raw(mask_width as u32, mask_height as u32, pixels).ok_or_else(
        || BgRemoveError::model("mask postprocessing", "mask buffer size mismatch"),
    )?;
    Ok(imageops::resize(&mask, width, height, FilterType::Lanczos3))
}
