use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::error::BokehError;

/// A single camera frame: contiguous 8-bit RGB or RGBA bytes in row-major order.
///
/// The caller owns the frame for the duration of a compositing call; the
/// compositor never keeps a reference to it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Validating constructor for buffers that arrive from outside the core.
    pub fn try_new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
    ) -> Result<Self, BokehError> {
        if width == 0 || height == 0 {
            return Err(BokehError::invalid(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if channels != 3 && channels != 4 {
            return Err(BokehError::invalid(format!(
                "frame must have 3 or 4 channels, got {channels}"
            )));
        }
        let expected = (width as usize) * (height as usize) * (channels as usize);
        if data.len() != expected {
            return Err(BokehError::invalid(format!(
                "frame data length {} does not match {width}x{height}x{channels} = {expected}",
                data.len()
            )));
        }
        Ok(Self::new(data, width, height, channels, index))
    }

    /// Solid-colour frame. Used by tests and by the CLI for placeholders.
    pub fn filled(width: u32, height: u32, pixel: &[u8], index: usize) -> Self {
        let data = pixel.repeat((width as usize) * (height as usize));
        Self::new(data, width, height, pixel.len() as u8, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let offset = ((y as usize) * (self.width as usize) + x as usize) * c;
        &self.data[offset..offset + c]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
