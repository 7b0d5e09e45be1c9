use crate::mask::MASK_ON;
use image::{GrayImage, Luma, RgbImage};
use ndarray::Array3;
use tracing::debug;

/// Per-pixel Gaussian background model
///
/// Each pixel channel keeps a running mean and variance. A pixel is foreground
/// when any channel deviates from its mean by more than `deviation_threshold`
/// standard deviations. Background pixels update the model with
/// `learning_rate`; foreground pixels are left out so a ball that pauses is
/// absorbed slowly.
pub struct BackgroundSubtractor {
    mean: Option<Array3<f32>>,
    variance: Option<Array3<f32>>,
    learning_rate: f32,
    deviation_threshold: f32,
    initial_variance: f32,
    min_variance: f32,
}

impl BackgroundSubtractor {
    /// Creates a subtractor whose model covers roughly `history` frames
    pub fn new(history: usize) -> Self {
        Self {
            mean: None,
            variance: None,
            learning_rate: 1.0 / history.max(1) as f32,
            deviation_threshold: 2.5,
            initial_variance: 15.0 * 15.0,
            min_variance: 4.0,
        }
    }

    /// Classifies the frame and updates the model; the first frame seeds the
    /// model and is reported as all background
    pub fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        let (width, height) = frame.dimensions();
        let shape = (height as usize, width as usize, 3);
        let pixels = Array3::from_shape_fn(shape, |(y, x, c)| {
            frame.get_pixel(x as u32, y as u32)[c] as f32
        });

        let seeded = matches!(&self.mean, Some(mean) if mean.dim() == shape);
        if !seeded {
            if self.mean.is_some() {
                debug!("frame size changed to {}x{}, reseeding background", width, height);
            }
            self.variance = Some(Array3::from_elem(shape, self.initial_variance));
            self.mean = Some(pixels);
            return GrayImage::new(width, height);
        }

        let (Some(mean), Some(variance)) = (self.mean.as_mut(), self.variance.as_mut()) else {
            return GrayImage::new(width, height);
        };

        let mut mask = GrayImage::new(width, height);
        let k2 = self.deviation_threshold * self.deviation_threshold;
        for y in 0..shape.0 {
            for x in 0..shape.1 {
                let foreground = (0..3).any(|c| {
                    let d = pixels[[y, x, c]] - mean[[y, x, c]];
                    d * d > k2 * variance[[y, x, c]]
                });
                if foreground {
                    mask.put_pixel(x as u32, y as u32, Luma([MASK_ON]));
                    continue;
                }
                for c in 0..3 {
                    let d = pixels[[y, x, c]] - mean[[y, x, c]];
                    mean[[y, x, c]] += self.learning_rate * d;
                    let v = variance[[y, x, c]] + self.learning_rate * (d * d - variance[[y, x, c]]);
                    variance[[y, x, c]] = v.max(self.min_variance);
                }
            }
        }
        mask
    }
}
