use std::cell::RefCell;

use crate::shared::constants::MAX_RADIUS;

thread_local! {
    // One scratch buffer per worker thread, grown to the largest frame seen.
    static SCRATCH: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

/// Normalizes a requested radius: 0 stays 0 (no-op), anything else is
/// clamped to `[1, MAX_RADIUS]`.
pub fn clamp_radius(radius: u32) -> u32 {
    radius.min(MAX_RADIUS)
}

/// Number of leading channels that get blurred. A trailing alpha channel
/// (LA or RGBA layouts) is left untouched.
pub fn color_channels(channels: usize) -> usize {
    match channels {
        2 => 1,
        4 => 3,
        n => n,
    }
}

/// Blurs using a per-thread scratch buffer, so repeated calls on the same
/// thread stop allocating once the buffer has grown to frame size.
pub fn stack_blur(data: &mut [u8], width: usize, height: usize, channels: usize, radius: u32) {
    SCRATCH.with(|scratch| match scratch.try_borrow_mut() {
        Ok(mut temp) => stack_blur_with_temp(data, width, height, channels, radius, &mut temp),
        // Re-entered on this thread; fall back to a private buffer.
        Err(_) => stack_blur_with_temp(data, width, height, channels, radius, &mut Vec::new()),
    });
}

/// Two-pass tent-kernel blur over interleaved 8-bit pixels, reusing `temp`.
///
/// Each output value is `sum((r + 1 - |k|) * p[x + k]) / (r + 1)^2` for
/// `k in -r..=r`, first along rows and then along columns. Reads past the
/// border replicate the edge pixel. Work per pass is O(width * height)
/// regardless of radius.
pub fn stack_blur_with_temp(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    radius: u32,
    temp: &mut Vec<u8>,
) {
    let radius = clamp_radius(radius) as usize;
    if radius == 0 || width == 0 || height == 0 || channels == 0 {
        return;
    }
    debug_assert_eq!(data.len(), width * height * channels);

    temp.clear();
    temp.resize(data.len(), 0);
    let blurred = color_channels(channels);
    let row_stride = width * channels;

    // Horizontal pass: data → temp
    for y in 0..height {
        for c in 0..blurred {
            blur_line(data, temp, y * row_stride + c, channels, width, radius);
        }
    }

    // Vertical pass: temp → data
    for x in 0..width {
        for c in 0..blurred {
            blur_line(temp, data, x * channels + c, row_stride, height, radius);
        }
    }
}

/// Blurs one strided line of `len` samples from `src` into `dst`.
///
/// `sum_out` holds the window's left half including the centre sample,
/// `sum_in` the right half. Sliding one step adds every right-half sample
/// one more time and removes every left-half sample once, so the weighted
/// sum updates in constant time.
fn blur_line(src: &[u8], dst: &mut [u8], start: usize, step: usize, len: usize, radius: usize) {
    let last = (len - 1) as isize;
    let at = |i: isize| -> u32 { src[start + i.clamp(0, last) as usize * step] as u32 };

    let r = radius as isize;
    let r1 = radius as u32 + 1;
    let divisor = r1 * r1;
    let half = divisor / 2;

    let first = at(0);
    let mut sum_out = first * r1;
    let mut sum = first * (r1 * (r1 + 1) / 2);
    let mut sum_in = 0u32;
    for k in 1..=r {
        let v = at(k);
        sum_in += v;
        sum += v * (r1 - k as u32);
    }

    for x in 0..len {
        dst[start + x * step] = ((sum + half) / divisor).min(255) as u8;

        let xi = x as isize;
        let incoming = at(xi + r + 1);
        let center = at(xi + 1);
        let outgoing = at(xi - r);
        sum = sum + sum_in + incoming - sum_out;
        sum_out = sum_out + center - outgoing;
        sum_in = sum_in + incoming - center;
    }
}
