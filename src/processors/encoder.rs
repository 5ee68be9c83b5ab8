// imgbound/src/processors/encoder.rs
use crate::core::{EncodedStream, ResizeError, Result, TargetFormat};
use image::codecs::jpeg::JpegEncoder;
use image::error::UnsupportedErrorKind;
use image::{ColorType, DynamicImage, ImageError};
use oxipng::{optimize_from_memory, Options};
use std::borrow::Cow;
use std::io::Cursor;

pub struct Encoder {
    quality: u8,
    optimize_png: bool,
}

impl Encoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
            optimize_png: false,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Serializes `image` as `format`. The returned stream is rewound to its
    /// first byte. Nothing is returned if the codec is missing or fails.
    pub fn encode(&self, image: &DynamicImage, format: TargetFormat) -> Result<EncodedStream> {
        log::debug!(
            "Encoding {}x{} image as {}, quality: {}",
            image.width(),
            image.height(),
            format,
            self.quality
        );

        if !format.is_lossy() && self.quality < 100 {
            log::debug!("{} is lossless, quality {} has no effect", format, self.quality);
        }

        let pixels = prepare_pixels(image, format);
        let mut buffer = Cursor::new(Vec::new());

        let written = match format {
            TargetFormat::Jpeg => {
                // The JPEG codec's scale starts at 1.
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality.max(1));
                pixels.write_with_encoder(encoder)
            }
            _ => pixels.write_to(&mut buffer, format.to_image_format()),
        };
        written.map_err(|e| map_encode_error(e, format))?;

        if format == TargetFormat::Png && self.optimize_png {
            let optimized = self.optimize_png_bytes(buffer.get_ref())?;
            buffer = Cursor::new(optimized);
        }

        let stream = EncodedStream::from_cursor(buffer);
        log::debug!("Encoded {} ({} bytes)", format, stream.len());
        Ok(stream)
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| ResizeError::Processing(format!("PNG optimization failed: {}", e)))
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_QUALITY)
    }
}

/// Converts pixel layouts a codec cannot store into the closest 8-bit layout
/// it accepts.
fn prepare_pixels(image: &DynamicImage, format: TargetFormat) -> Cow<'_, DynamicImage> {
    let color = image.color();
    let supported = match format {
        TargetFormat::Jpeg => matches!(color, ColorType::L8 | ColorType::Rgb8),
        TargetFormat::Png => matches!(
            color,
            ColorType::L8
                | ColorType::La8
                | ColorType::Rgb8
                | ColorType::Rgba8
                | ColorType::L16
                | ColorType::La16
                | ColorType::Rgb16
                | ColorType::Rgba16
        ),
        TargetFormat::Tiff => matches!(
            color,
            ColorType::L8
                | ColorType::Rgb8
                | ColorType::Rgba8
                | ColorType::L16
                | ColorType::Rgb16
                | ColorType::Rgba16
        ),
        TargetFormat::Bmp | TargetFormat::Gif | TargetFormat::WebP => {
            matches!(color, ColorType::Rgb8 | ColorType::Rgba8)
        }
        TargetFormat::Avif | TargetFormat::Qoi => true,
    };

    if supported {
        return Cow::Borrowed(image);
    }

    log::debug!("Converting {:?} pixels for {} output", color, format);

    let converted = match format {
        TargetFormat::Jpeg if color == ColorType::L16 => DynamicImage::ImageLuma8(image.to_luma8()),
        TargetFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    };
    Cow::Owned(converted)
}

fn map_encode_error(err: ImageError, format: TargetFormat) -> ResizeError {
    match err {
        ImageError::Unsupported(ref e) if matches!(e.kind(), UnsupportedErrorKind::Format(_)) => {
            ResizeError::UnsupportedFormat(format!("No {} encoder available", format))
        }
        other => ResizeError::Encode(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

    fn noisy(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) as u8;
            Rgb([v, v.wrapping_add(80), v.wrapping_mul(3)])
        }))
    }

    #[test]
    fn stream_is_rewound() {
        let stream = Encoder::new(90).encode(&noisy(16, 16), TargetFormat::Png).unwrap();
        assert_eq!(stream.position(), 0);
        assert!(!stream.is_empty());
    }

    #[test]
    fn encodes_every_builtin_format() {
        let image = noisy(24, 12);
        for format in [
            TargetFormat::Tiff,
            TargetFormat::Jpeg,
            TargetFormat::Png,
            TargetFormat::Bmp,
            TargetFormat::Gif,
            TargetFormat::WebP,
        ] {
            let stream = Encoder::new(80).encode(&image, format).unwrap();
            let decoded = image::load_from_memory_with_format(stream.as_bytes(), format.to_image_format())
                .unwrap_or_else(|e| panic!("{} did not decode: {}", format, e));
            assert_eq!(decoded.dimensions(), (24, 12), "{}", format);
        }
    }

    #[test]
    fn missing_codec_is_unsupported_format() {
        let image = noisy(4, 4);
        for format in [TargetFormat::Avif, TargetFormat::Qoi] {
            let result = Encoder::default().encode(&image, format);
            assert!(
                matches!(result, Err(ResizeError::UnsupportedFormat(_))),
                "{} should be unsupported",
                format
            );
        }
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let image = noisy(128, 128);
        let low = Encoder::new(10).encode(&image, TargetFormat::Jpeg).unwrap();
        let high = Encoder::new(95).encode(&image, TargetFormat::Jpeg).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn jpeg_accepts_zero_quality() {
        let stream = Encoder::new(0).encode(&noisy(8, 8), TargetFormat::Jpeg).unwrap();
        assert!(!stream.is_empty());
    }

    #[test]
    fn rgba_input_encodes_as_jpeg() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 6, Rgba([200, 10, 10, 128])));
        let stream = Encoder::new(85).encode(&image, TargetFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory(stream.as_bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (10, 6));
    }

    #[test]
    fn optimized_png_still_decodes() {
        let image = noisy(32, 32);
        let stream = Encoder::new(100)
            .with_png_optimization(true)
            .encode(&image, TargetFormat::Png)
            .unwrap();
        assert_eq!(stream.position(), 0);
        let decoded = image::load_from_memory(stream.as_bytes()).unwrap();
        assert_eq!(decoded.to_rgb8(), image.to_rgb8());
    }
}
