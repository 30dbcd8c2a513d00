use crate::masking::scaled_mask::ScaledMask;
use crate::shared::error::BokehError;
use crate::shared::frame::Frame;

/// Draws `foreground` over `background` using `mask` as per-pixel alpha.
///
/// Each colour channel becomes `(fg * a + bg * (255 - a)) / 255`, rounded.
/// A fully opaque mask therefore reproduces `foreground` exactly and a
/// fully transparent one reproduces `background`. The output alpha channel,
/// when present, is 255.
pub fn blend_over(
    foreground: &Frame,
    background: &Frame,
    mask: &ScaledMask,
) -> Result<Frame, BokehError> {
    let (w, h, channels) = (foreground.width(), foreground.height(), foreground.channels());
    if background.width() != w || background.height() != h || background.channels() != channels {
        return Err(BokehError::invalid(format!(
            "background {}x{}x{} does not match foreground {w}x{h}x{channels}",
            background.width(),
            background.height(),
            background.channels()
        )));
    }
    if mask.width() != w || mask.height() != h {
        return Err(BokehError::invalid(format!(
            "mask {}x{} does not match frame {w}x{h}",
            mask.width(),
            mask.height()
        )));
    }

    let channels = channels as usize;
    let color = channels.min(3);
    let mut out = vec![0u8; foreground.data().len()];

    let pixels = out
        .chunks_exact_mut(channels)
        .zip(foreground.data().chunks_exact(channels))
        .zip(background.data().chunks_exact(channels))
        .zip(mask.alpha());

    for (((dst, fg), bg), &a) in pixels {
        let a = a as u32;
        let inv = 255 - a;
        for c in 0..color {
            let v = (fg[c] as u32 * a + bg[c] as u32 * inv + 127) / 255;
            dst[c] = v.min(255) as u8;
        }
        if channels == 4 {
            dst[3] = 255;
        }
    }

    Ok(Frame::new(
        out,
        foreground.width(),
        foreground.height(),
        foreground.channels(),
        foreground.index(),
    ))
}
