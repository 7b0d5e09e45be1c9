use crate::locator::Detection;
use crate::trajectory::{TrailSegment, TrajectoryBuffer};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    BresenhamLineIter, draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut,
};

const TRAIL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const MARKER_RADIUS: i32 = 5;
const OUTLINE_WIDTH: i32 = 2;

/// Returns an annotated copy of `frame` with the trail and the current
/// detection drawn on it, plus the number of trail segments drawn
pub fn annotate_frame(
    frame: &RgbImage,
    trajectory: &TrajectoryBuffer,
    detection: Option<&Detection>,
) -> (RgbImage, usize) {
    let mut annotated = frame.clone();

    if let Some(detection) = detection {
        draw_detection(&mut annotated, detection);
    }

    let mut drawn = 0;
    for segment in trajectory.segments() {
        draw_segment(&mut annotated, &segment);
        drawn += 1;
    }
    (annotated, drawn)
}

fn draw_detection(img: &mut RgbImage, detection: &Detection) {
    if let Some(circle) = detection.enclosing {
        let center = (circle.cx as i32, circle.cy as i32);
        let radius = circle.radius as i32;
        for offset in 0..OUTLINE_WIDTH {
            if radius - offset >= 0 {
                draw_hollow_circle_mut(img, center, radius - offset, OUTLINE_COLOR);
            }
        }
    }
    let c = detection.center;
    draw_filled_circle_mut(img, (c.x, c.y), MARKER_RADIUS, MARKER_COLOR);
}

/// Draws a segment of the given thickness by stamping discs along it
fn draw_segment(img: &mut RgbImage, segment: &TrailSegment) {
    let start = (segment.from.x as f32, segment.from.y as f32);
    let end = (segment.to.x as f32, segment.to.y as f32);
    if segment.thickness <= 1 {
        draw_line_segment_mut(img, start, end, TRAIL_COLOR);
        return;
    }
    let radius = (segment.thickness / 2) as i32;
    for (x, y) in BresenhamLineIter::new(start, end) {
        draw_filled_circle_mut(img, (x, y), radius, TRAIL_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Point};

    fn blank() -> RgbImage {
        RgbImage::from_pixel(100, 80, Rgb([0, 0, 0]))
    }

    fn painted(img: &RgbImage) -> usize {
        img.pixels().filter(|p| p.0 != [0, 0, 0]).count()
    }

    #[test]
    fn test_original_frame_is_untouched() {
        let frame = blank();
        let mut trajectory = TrajectoryBuffer::new(8, 2.5);
        trajectory.push(Some(Point::new(10, 10)));
        trajectory.push(Some(Point::new(40, 30)));
        let detection = Detection::at(Point::new(40, 30));

        let (annotated, drawn) = annotate_frame(&frame, &trajectory, Some(&detection));
        assert_eq!(drawn, 1);
        assert_eq!(painted(&frame), 0);
        assert!(painted(&annotated) > 0);
        assert_eq!(annotated.get_pixel(40, 30), &MARKER_COLOR);
        assert_eq!(annotated.get_pixel(25, 20), &TRAIL_COLOR);
    }

    #[test]
    fn test_gaps_are_not_bridged() {
        let frame = blank();
        let mut trajectory = TrajectoryBuffer::new(8, 2.5);
        trajectory.push(Some(Point::new(10, 10)));
        trajectory.push(None);
        trajectory.push(Some(Point::new(80, 10)));

        let (annotated, drawn) = annotate_frame(&frame, &trajectory, None);
        assert_eq!(drawn, 0);
        assert_eq!(painted(&annotated), 0);
    }

    #[test]
    fn test_enclosing_circle_is_outlined() {
        let frame = blank();
        let trajectory = TrajectoryBuffer::new(0, 2.5);
        let detection = Detection {
            center: Point::new(50, 40),
            enclosing: Some(Circle::new(50.0, 40.0, 20.0)),
        };
        let (annotated, drawn) = annotate_frame(&frame, &trajectory, Some(&detection));
        assert_eq!(drawn, 0);
        assert_eq!(annotated.get_pixel(70, 40), &OUTLINE_COLOR);
        assert_eq!(annotated.get_pixel(60, 40), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_empty_trajectory_draws_nothing() {
        let frame = blank();
        let trajectory = TrajectoryBuffer::new(0, 2.5);
        let (annotated, drawn) = annotate_frame(&frame, &trajectory, None);
        assert_eq!(drawn, 0);
        assert_eq!(annotated, frame);
    }
}
