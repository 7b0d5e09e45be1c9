use image::{GrayImage, Luma, RgbImage};

/// Value written for pixels inside a mask
pub const MASK_ON: u8 = 255;

/// An 8-bit HSV triple: hue in [0, 180), saturation and value in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Converts an RGB pixel, halving the hue so it fits a byte
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };
        let mut h = if delta == 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        if h < 0.0 {
            h += 360.0;
        }

        // 360 degrees round to 180, which wraps back to red
        let h = ((h / 2.0).round() as u32 % 180) as u8;
        Self::new(h, s.round() as u8, max as u8)
    }

    /// Inclusive per-channel range check
    pub fn within(&self, lower: &Hsv, upper: &Hsv) -> bool {
        (lower.h..=upper.h).contains(&self.h)
            && (lower.s..=upper.s).contains(&self.s)
            && (lower.v..=upper.v).contains(&self.v)
    }
}

/// Marks every pixel whose HSV value lies inside `[lower, upper]`
pub fn color_range_mask(frame: &RgbImage, lower: &Hsv, upper: &Hsv) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let p = frame.get_pixel(x, y);
        if Hsv::from_rgb(p[0], p[1], p[2]).within(lower, upper) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

/// Logical AND of two masks of equal size
pub fn and_masks(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        if a.get_pixel(x, y)[0] != 0 && b.get_pixel(x, y)[0] != 0 {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}
