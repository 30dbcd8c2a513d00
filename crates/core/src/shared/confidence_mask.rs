use ndarray::{Array2, ArrayView2};

use crate::shared::error::BokehError;

/// Per-pixel foreground probability produced by the segmentation model.
///
/// Usually lower resolution than the frame it describes. Immutable once
/// produced; the mask processor reads it and builds a fresh alpha buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfidenceMask {
    values: Vec<f32>,
    width: u32,
    height: u32,
}

impl ConfidenceMask {
    pub fn try_new(values: Vec<f32>, width: u32, height: u32) -> Result<Self, BokehError> {
        if width == 0 || height == 0 {
            return Err(BokehError::invalid(format!(
                "mask dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = (width as usize) * (height as usize);
        if values.len() != expected {
            return Err(BokehError::invalid(format!(
                "mask length {} does not match {width}x{height} = {expected}",
                values.len()
            )));
        }
        Ok(Self {
            values,
            width,
            height,
        })
    }

    /// Builds a mask from a `(height, width)` array, the layout segmentation
    /// models emit.
    pub fn from_array(array: &Array2<f32>) -> Result<Self, BokehError> {
        let (h, w) = array.dim();
        let values: Vec<f32> = array.iter().copied().collect();
        Self::try_new(values, w as u32, h as u32)
    }

    pub fn uniform(width: u32, height: u32, value: f32) -> Self {
        Self {
            values: vec![value; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Confidence at `(x, y)`, clamped to `[0, 1]`. Non-finite values read as 0.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        let v = self.values[y * self.width as usize + x];
        if v.is_finite() {
            v.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn as_ndarray(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.values)
            .expect("Mask length must match dimensions")
    }
}
