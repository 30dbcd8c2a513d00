use serde::{Deserialize, Serialize};

use crate::blurring::infrastructure::stack_blur;
use crate::masking::scaled_mask::ScaledMask;
use crate::shared::confidence_mask::ConfidenceMask;
use crate::shared::error::BokehError;

/// Resampling filter used to bring the mask up to frame resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    #[default]
    Bilinear,
    Nearest,
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleFilter::Bilinear => write!(f, "bilinear"),
            ResampleFilter::Nearest => write!(f, "nearest"),
        }
    }
}

/// Quantizes a confidence in `[0, 1]` to an 8-bit alpha.
pub fn quantize(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Resamples `mask` to `target_width` x `target_height` and quantizes it to
/// 8-bit alpha.
///
/// Sample positions are aligned on pixel centres, so a mask already at the
/// target size maps through unchanged.
pub fn scale_mask(
    mask: &ConfidenceMask,
    target_width: u32,
    target_height: u32,
    filter: ResampleFilter,
) -> Result<ScaledMask, BokehError> {
    if mask.width() == 0 || mask.height() == 0 {
        return Err(BokehError::invalid("mask dimensions must be non-zero"));
    }
    if target_width == 0 || target_height == 0 {
        return Err(BokehError::invalid(format!(
            "target dimensions must be non-zero, got {target_width}x{target_height}"
        )));
    }

    let tw = target_width as usize;
    let th = target_height as usize;
    let mut alpha = vec![0u8; tw * th];

    match filter {
        ResampleFilter::Nearest => scale_nearest(mask, tw, th, &mut alpha),
        ResampleFilter::Bilinear => scale_bilinear(mask, tw, th, &mut alpha),
    }

    Ok(ScaledMask::new(alpha, target_width, target_height))
}

/// Softens hard mask edges with a single-channel blur. Radius 0 is a no-op.
pub fn feather_mask(mut mask: ScaledMask, feather_radius: u32) -> ScaledMask {
    if feather_radius == 0 {
        return mask;
    }
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    stack_blur::stack_blur(mask.alpha_mut(), width, height, 1, feather_radius);
    mask
}

fn source_coord(dst: usize, dst_len: usize, src_len: usize) -> f32 {
    let scale = src_len as f32 / dst_len as f32;
    ((dst as f32 + 0.5) * scale - 0.5).clamp(0.0, (src_len - 1) as f32)
}

fn scale_nearest(mask: &ConfidenceMask, tw: usize, th: usize, alpha: &mut [u8]) {
    let sw = mask.width() as usize;
    let sh = mask.height() as usize;
    let nearest = |dst: usize, dst_len: usize, src_len: usize| {
        ((2 * dst + 1) * src_len / (2 * dst_len)).min(src_len - 1)
    };
    let x_map: Vec<usize> = (0..tw).map(|x| nearest(x, tw, sw)).collect();
    for y in 0..th {
        let sy = nearest(y, th, sh);
        let row = &mut alpha[y * tw..(y + 1) * tw];
        for (out, &sx) in row.iter_mut().zip(&x_map) {
            *out = quantize(mask.get(sx, sy));
        }
    }
}

fn scale_bilinear(mask: &ConfidenceMask, tw: usize, th: usize, alpha: &mut [u8]) {
    let sw = mask.width() as usize;
    let sh = mask.height() as usize;

    // Horizontal taps are the same for every row.
    let x_taps: Vec<(usize, usize, f32)> = (0..tw)
        .map(|x| {
            let sx = source_coord(x, tw, sw);
            let x0 = sx.floor() as usize;
            (x0, (x0 + 1).min(sw - 1), sx - x0 as f32)
        })
        .collect();

    for y in 0..th {
        let sy = source_coord(y, th, sh);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(sh - 1);
        let fy = sy - y0 as f32;

        let row = &mut alpha[y * tw..(y + 1) * tw];
        for (out, &(x0, x1, fx)) in row.iter_mut().zip(&x_taps) {
            let v00 = mask.get(x0, y0);
            let v10 = mask.get(x1, y0);
            let v01 = mask.get(x0, y1);
            let v11 = mask.get(x1, y1);
            let v = v00 * (1.0 - fx) * (1.0 - fy)
                + v10 * fx * (1.0 - fy)
                + v01 * (1.0 - fx) * fy
                + v11 * fx * fy;
            *out = quantize(v);
        }
    }
}
