use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use tracing::debug;

use crate::{
    errors::{BgRemoveError, Result},
    imageops_ai::mask::cutout,
    traits::MaskModel,
};

/// Removes the background of an encoded image and returns it as PNG bytes.
pub fn remove<M: MaskModel + ?Sized>(model: &M, input: &[u8]) -> Result<Vec<u8>> {
    let img = decode(input)?;
    debug!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "decoded source image"
    );

    let mask = model.predict_mask(&img)?;
    let rgba = img.to_rgba8();
    let cut = cutout(&rgba, &mask).map_err(|e| BgRemoveError::image("mask cutout", e))?;

    encode_png(&DynamicImage::ImageRgba8(cut))
}

/// Decodes with format sniffing and applies the EXIF orientation, if any.
pub fn decode(input: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| BgRemoveError::image("image format detection", e))?;
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| BgRemoveError::image("image decoding", e))?;
    let orientation = decoder
        .orientation()
        .map_err(|e| BgRemoveError::image("orientation lookup", e))?;
    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| BgRemoveError::image("image decoding", e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| BgRemoveError::image("PNG encoding", e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockMaskModel;
    use image::{GenericImageView, Rgb, RgbImage, Rgba};

    fn encoded_rgb(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 200, 30])));
        encode_png(&img).unwrap()
    }

    #[test]
    fn test_remove_returns_png_with_alpha() -> Result<()> {
        let output = remove(&MockMaskModel::left_half(), &encoded_rgb(4, 2))?;

        assert_eq!(image::guess_format(&output)?, ImageFormat::Png);
        let decoded = decode(&output)?;
        assert_eq!(decoded.dimensions(), (4, 2));
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.get_pixel(0, 0), Rgba([10, 200, 30, 255]));
        assert_eq!(decoded.get_pixel(3, 1), Rgba([0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_remove_is_deterministic() -> Result<()> {
        let input = encoded_rgb(8, 8);
        let model = MockMaskModel::left_half();

        assert_eq!(remove(&model, &input)?, remove(&model, &input)?);
        Ok(())
    }

    #[test]
    fn test_remove_rejects_garbage_input() {
        let err = remove(&MockMaskModel::opaque(), b"definitely not an image").unwrap_err();
        assert!(matches!(err, BgRemoveError::ImageProcessing { .. }));
    }

    #[test]
    fn test_remove_propagates_model_failure() {
        let err = remove(&MockMaskModel::failing(), &encoded_rgb(2, 2)).unwrap_err();
        assert!(matches!(err, BgRemoveError::Model { .. }));
    }
}
