use crate::errors::{BgRemoveError, Result};
use crate::traits::MaskModel;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockMask {
    Opaque,
    LeftHalf,
    Failing,
}

/// Deterministic mask model for tests; needs no ONNX file.
#[derive(Debug, Clone)]
pub struct MockMaskModel {
    mask: MockMask,
}

impl MockMaskModel {
    /// Everything is foreground.
    pub const fn opaque() -> Self {
        Self {
            mask: MockMask::Opaque,
        }
    }

    /// Columns left of the centre are foreground, the rest background.
    pub const fn left_half() -> Self {
        Self {
            mask: MockMask::LeftHalf,
        }
    }

    /// Every prediction fails with a model error.
    pub const fn failing() -> Self {
        Self {
            mask: MockMask::Failing,
        }
    }
}

impl MaskModel for MockMaskModel {
    fn predict_mask(&self, img: &DynamicImage) -> Result<GrayImage> {
        let (width, height) = img.dimensions();
        match self.mask {
            MockMask::Opaque => Ok(GrayImage::from_pixel(width, height, Luma([255]))),
            MockMask::LeftHalf => Ok(GrayImage::from_fn(width, height, |x, _| {
                if x < width / 2 {
                    Luma([255])
                } else {
                    Luma([0])
                }
            })),
            MockMask::Failing => Err(BgRemoveError::model(
                "mock inference",
                "mock model always fails",
            )),
        }
    }
}
