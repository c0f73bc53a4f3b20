// sizetailor/src/processors/codec.rs
use crate::core::{Result, TailorError};
use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, RgbImage};

/// Decode/encode capability the compress search is driven through.
///
/// `decode` runs once per compress call; `encode` runs once per sampled
/// quality. Quality is a value in `[0, 1]`, higher meaning larger output.
pub trait ImageCodec {
    type Image;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Image>;

    fn encode(&self, image: &Self::Image, quality: f64) -> Result<Vec<u8>>;

    /// Extension of the files `encode` produces, without the dot.
    fn extension(&self) -> &'static str;

    fn media_type(&self) -> &'static str;
}

/// Lossy JPEG codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl JpegCodec {
    pub fn new() -> Self {
        Self
    }

    /// Maps `[0, 1]` onto the encoder's `1..=100` scale.
    pub fn encoder_quality(quality: f64) -> u8 {
        let scaled = (quality * 100.0).round();
        if scaled.is_nan() {
            return 1;
        }
        scaled.clamp(1.0, 100.0) as u8
    }
}

impl ImageCodec for JpegCodec {
    type Image = RgbImage;

    fn decode(&self, bytes: &[u8]) -> Result<RgbImage> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| TailorError::Decode(e.to_string()))?;

        let (width, height) = image.dimensions();
        log::debug!("Decoded {}x{} image, color: {:?}", width, height, image.color());

        // JPEG carries no alpha channel
        Ok(image.to_rgb8())
    }

    fn encode(&self, image: &RgbImage, quality: f64) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, Self::encoder_quality(quality))
            .encode_image(image)
            .map_err(|e| TailorError::Encode(e.to_string()))?;

        Ok(buffer)
    }

    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn media_type(&self) -> &'static str {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_mapping() {
        assert_eq!(JpegCodec::encoder_quality(0.0), 1);
        assert_eq!(JpegCodec::encoder_quality(0.01), 1);
        assert_eq!(JpegCodec::encoder_quality(0.5), 50);
        assert_eq!(JpegCodec::encoder_quality(0.875), 88);
        assert_eq!(JpegCodec::encoder_quality(1.0), 100);
        assert_eq!(JpegCodec::encoder_quality(f64::NAN), 1);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = JpegCodec::new().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TailorError::Decode(_)));
    }

    #[test]
    fn encode_produces_jpeg() {
        let image = RgbImage::from_fn(32, 32, |x, y| image::Rgb([x as u8 * 8, y as u8 * 8, 128]));
        let bytes = JpegCodec::new().encode(&image, 0.8).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = JpegCodec::new().decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
    }
}
