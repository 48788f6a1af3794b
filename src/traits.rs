use crate::errors::Result;
use image::{DynamicImage, GrayImage};

/// A salient-object model that separates foreground from background.
///
/// Implementations return a mask with the same dimensions as the input where
/// 255 is foreground and 0 is background.
pub trait MaskModel: Send + Sync {
    fn predict_mask(&self, img: &DynamicImage) -> Result<GrayImage>;
}

/// The opaque segmentation function the runner delegates to: encoded image
/// bytes in, encoded image bytes out.
pub trait Segmenter {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl<M: MaskModel> Segmenter for M {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>> {
        crate::remove::remove(self, input)
    }
}
