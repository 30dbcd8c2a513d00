use std::path::Path;

use crate::shared::confidence_mask::ConfidenceMask;
use crate::shared::frame::Frame;

/// Loads frames and precomputed confidence masks from image files.
///
/// Images with an alpha channel decode to RGBA frames, everything else to
/// RGB. Masks are read as 8-bit grayscale, where white is foreground.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_frame(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)?;
        let (width, height) = (img.width(), img.height());
        let frame = if img.color().has_alpha() {
            Frame::try_new(img.to_rgba8().into_raw(), width, height, 4, 0)?
        } else {
            Frame::try_new(img.to_rgb8().into_raw(), width, height, 3, 0)?
        };
        log::debug!(
            "Read {width}x{height} frame ({} channels) from {}",
            frame.channels(),
            path.display()
        );
        Ok(frame)
    }

    pub fn read_mask(&self, path: &Path) -> Result<ConfidenceMask, Box<dyn std::error::Error>> {
        let luma = image::open(path)?.to_luma8();
        let (width, height) = luma.dimensions();
        let values = luma.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
        Ok(ConfidenceMask::try_new(values, width, height)?)
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_read_rgb_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        RgbImage::from_pixel(6, 4, Rgb([9, 8, 7])).save(&path).unwrap();

        let frame = ImageFileReader::new().read_frame(&path).unwrap();
        assert_eq!((frame.width(), frame.height(), frame.channels()), (6, 4, 3));
        assert_eq!(frame.pixel(5, 3), &[9, 8, 7]);
    }

    #[test]
    fn test_read_rgba_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 200])).save(&path).unwrap();

        let frame = ImageFileReader::new().read_frame(&path).unwrap();
        assert_eq!(frame.channels(), 4);
        assert_eq!(frame.pixel(1, 1), &[1, 2, 3, 200]);
    }

    #[test]
    fn test_read_mask_normalizes_to_unit_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mut img = GrayImage::from_pixel(4, 2, Luma([0]));
        img.put_pixel(3, 1, Luma([255]));
        img.save(&path).unwrap();

        let mask = ImageFileReader::new().read_mask(&path).unwrap();
        assert_eq!((mask.width(), mask.height()), (4, 2));
        assert_relative_eq!(mask.get(0, 0), 0.0);
        assert_relative_eq!(mask.get(3, 1), 1.0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageFileReader::new()
            .read_frame(&dir.path().join("missing.png"))
            .is_err());
    }
}
