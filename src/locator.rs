use crate::background::BackgroundSubtractor;
use crate::config::TrackingTuning;
use crate::geometry::{self, Circle, Point};
use crate::mask::{self, Hsv};
use anyhow::Result;
use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::find_contours;
use tracing::debug;

/// Frames the background model remembers
const BACKGROUND_HISTORY: usize = 200;

/// The tracked object's position in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub center: Point,
    /// Enclosing circle, present when the centroid came from the region's
    /// moments and the circle is larger than the minimum radius
    pub enclosing: Option<Circle>,
}

impl Detection {
    pub fn at(center: Point) -> Self {
        Self {
            center,
            enclosing: None,
        }
    }
}

/// Finds at most one object per frame
pub trait ObjectLocator {
    fn locate(&mut self, frame: &RgbImage) -> Result<Option<Detection>>;
}

/// Locates the largest moving region of a color range
pub struct ColorBlobLocator {
    lower: Hsv,
    upper: Hsv,
    min_radius: f32,
    background: BackgroundSubtractor,
}

impl ColorBlobLocator {
    pub fn new(tuning: &TrackingTuning) -> Self {
        Self {
            lower: tuning.color_lower,
            upper: tuning.color_upper,
            min_radius: tuning.min_radius,
            background: BackgroundSubtractor::new(BACKGROUND_HISTORY),
        }
    }
}

impl ObjectLocator for ColorBlobLocator {
    fn locate(&mut self, frame: &RgbImage) -> Result<Option<Detection>> {
        let foreground = self.background.apply(frame);
        let color = mask::color_range_mask(frame, &self.lower, &self.upper);
        let combined = mask::and_masks(&color, &foreground);
        Ok(locate_in_mask(&combined, self.min_radius))
    }
}

/// Picks the largest contour of a binary mask and reduces it to a detection
///
/// The outermost pixel ring is treated as background so a region filling the
/// whole frame still has a boundary. Ties in area keep the contour found first.
pub fn locate_in_mask(mask: &GrayImage, min_radius: f32) -> Option<Detection> {
    let contours = find_contours::<i32>(&with_clear_border(mask));
    debug!("contours: {}", contours.len());

    let mut largest: Option<(f64, Vec<Point>)> = None;
    for contour in contours {
        let points: Vec<Point> = contour.points.iter().map(|p| Point::new(p.x, p.y)).collect();
        let area = geometry::contour_area(&points);
        if largest.as_ref().is_none_or(|(best, _)| area > *best) {
            largest = Some((area, points));
        }
    }

    let (_, points) = largest?;
    detect_from_contour(&points, min_radius)
}

fn with_clear_border(mask: &GrayImage) -> GrayImage {
    let mut cleared = mask.clone();
    let (width, height) = cleared.dimensions();
    if width == 0 || height == 0 {
        return cleared;
    }
    for x in 0..width {
        cleared.put_pixel(x, 0, Luma([0]));
        cleared.put_pixel(x, height - 1, Luma([0]));
    }
    for y in 0..height {
        cleared.put_pixel(0, y, Luma([0]));
        cleared.put_pixel(width - 1, y, Luma([0]));
    }
    cleared
}

/// Reduces one contour to a detection
///
/// Regions with a zero zeroth moment have no centroid; their first boundary
/// point stands in for it when the enclosing circle is big enough.
pub fn detect_from_contour(points: &[Point], min_radius: f32) -> Option<Detection> {
    let circle = geometry::min_enclosing_circle(points)?;
    let moments = geometry::polygon_moments(points);

    match moments.centroid() {
        Some(center) => Some(Detection {
            center,
            enclosing: (circle.radius > min_radius).then_some(circle),
        }),
        None if circle.radius > min_radius => Some(Detection::at(points[0])),
        None => {
            debug!("degenerate region below minimum radius: {:?}", circle);
            None
        }
    }
}
