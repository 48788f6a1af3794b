use anyhow::{anyhow, ensure, Result};
use image::{GenericImageView, ImageBuffer, Luma, Pixel, Primitive, Rgba};
use num_traits::AsPrimitive;

use crate::imageops_ai::{get_max_value, is_floating_point};

/// Composites `image` over a fully transparent canvas through `mask`.
///
/// Every channel, alpha included, is scaled by `mask / max`, so background
/// pixels become transparent black and partially masked edges fade out.
pub fn cutout<I, M, SI, SM>(image: &I, mask: &M) -> Result<ImageBuffer<Rgba<SI>, Vec<SI>>>
where
    I: GenericImageView<Pixel = Rgba<SI>>,
    M: GenericImageView<Pixel = Luma<SM>>,
    Rgba<SI>: Pixel<Subpixel = SI>,
    SI: Primitive + 'static + AsPrimitive<f32>,
    SM: Primitive + 'static + AsPrimitive<f32>,
    f32: AsPrimitive<SI>,
{
    ensure!(
        image.dimensions() == mask.dimensions(),
        "Image and mask dimensions do not match: image {:?}, mask {:?}",
        image.dimensions(),
        mask.dimensions()
    );

    let sm_max: f32 = get_max_value::<SM>().as_();
    let rounding = if is_floating_point::<SI>() {
        0.0
    } else {
        0.5
    };

    let processed_pixels = image
        .pixels()
        .zip(mask.pixels())
        .flat_map(|(image_pixel, mask_pixel)| {
            let Luma([alpha]) = mask_pixel.2;
            let Rgba(channels) = image_pixel.2;
            let weight = alpha.as_() / sm_max;
            channels.map(|c| -> SI { (c.as_() * weight + rounding).as_() })
        })
        .collect::<Vec<SI>>();

    ImageBuffer::from_raw(image.width(), image.height(), processed_pixels)
        .ok_or_else(|| anyhow!("Failed to create ImageBuffer from processed pixels"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgba32FImage, RgbaImage};

    #[test]
    fn test_cutout_keeps_foreground_and_clears_background() -> Result<()> {
        let image = RgbaImage::from_pixel(2, 1, Rgba([200, 100, 50, 255]));
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(0, 0, Luma([255]));
        mask.put_pixel(1, 0, Luma([0]));

        let result = cutout(&image, &mask)?;

        assert_eq!(result.get_pixel(0, 0), &Rgba([200, 100, 50, 255]));
        assert_eq!(result.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_cutout_scales_partial_mask() -> Result<()> {
        let image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let mask = GrayImage::from_pixel(1, 1, Luma([128]));

        let result = cutout(&image, &mask)?;

        assert_eq!(result.get_pixel(0, 0), &Rgba([128, 128, 128, 128]));
        Ok(())
    }

    #[test]
    fn test_cutout_respects_existing_alpha() -> Result<()> {
        let image = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 102]));
        let mask = GrayImage::from_pixel(1, 1, Luma([255]));

        let result = cutout(&image, &mask)?;

        assert_eq!(result.get_pixel(0, 0)[3], 102);
        Ok(())
    }

    #[test]
    fn test_cutout_float_image_is_not_rounded() -> Result<()> {
        let image = Rgba32FImage::from_pixel(1, 1, Rgba([1.0, 0.5, 0.25, 1.0]));
        let mask = GrayImage::from_pixel(1, 1, Luma([51]));

        let result = cutout(&image, &mask)?;

        let Rgba([r, g, b, a]) = *result.get_pixel(0, 0);
        assert!((r - 0.2).abs() < 1e-6);
        assert!((g - 0.1).abs() < 1e-6);
        assert!((b - 0.05).abs() < 1e-6);
        assert!((a - 0.2).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_cutout_rejects_dimension_mismatch() {
        let image = RgbaImage::new(4, 4);
        let mask = GrayImage::new(3, 4);

        assert!(cutout(&image, &mask).is_err());
    }
}
