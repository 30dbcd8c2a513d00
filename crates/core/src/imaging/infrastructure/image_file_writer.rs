use std::path::Path;

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// Writes a composited frame to an image file using the `image` crate.
///
/// RGB frames are saved as RGB, RGBA frames keep their alpha channel.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_dynamic_image(frame: &Frame) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let (w, h, data) = (frame.width(), frame.height(), frame.data().to_vec());
    match frame.channels() {
        3 => RgbImage::from_raw(w, h, data)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| "Failed to create RGB image from frame data".into()),
        4 => RgbaImage::from_raw(w, h, data)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(|| "Failed to create RGBA image from frame data".into()),
        n => Err(format!("Unsupported channel count: {n}").into()),
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = to_dynamic_image(frame)?;
        let img = match size {
            Some((w, h)) => img.resize_exact(w, h, image::imageops::FilterType::Triangle),
            None => img,
        };

        img.save(path)?;
        log::debug!("Wrote {}x{} frame to {}", img.width(), img.height(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_rgb_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = Frame::filled(50, 40, &[50, 100, 200], 0);
        ImageFileWriter::new().write(&path, &frame, None).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 40));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_rgba_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = Frame::filled(4, 4, &[1, 2, 3, 255], 0);
        ImageFileWriter::new().write(&path, &frame, None).unwrap();

        let img = image::open(&path).unwrap();
        assert!(img.color().has_alpha());
    }

    #[test]
    fn test_write_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("thumb.png");
        let frame = Frame::filled(200, 100, &[128, 128, 128], 0);
        ImageFileWriter::new()
            .write(&path, &frame, Some((64, 32)))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 32));
    }

    #[test]
    fn test_write_under_a_file_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let frame = Frame::filled(2, 2, &[0, 0, 0], 0);
        assert!(ImageFileWriter::new()
            .write(&blocker.join("out.png"), &frame, None)
            .is_err());
    }
}
