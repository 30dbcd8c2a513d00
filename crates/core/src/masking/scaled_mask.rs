/// Frame-resolution 8-bit alpha derived from a [`ConfidenceMask`].
///
/// Scoped to one compositing call.
///
/// [`ConfidenceMask`]: crate::shared::confidence_mask::ConfidenceMask
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaledMask {
    alpha: Vec<u8>,
    width: u32,
    height: u32,
}

impl ScaledMask {
    pub fn new(alpha: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            alpha.len(),
            (width as usize) * (height as usize),
            "alpha length must equal width * height"
        );
        Self {
            alpha,
            width,
            height,
        }
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn alpha_mut(&mut self) -> &mut [u8] {
        &mut self.alpha
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y as usize) * (self.width as usize) + x as usize]
    }
}
