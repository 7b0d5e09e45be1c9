/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A circle in sub-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { cx, cy, radius }
    }

    fn contains(&self, (x, y): (f64, f64)) -> bool {
        let (dx, dy) = (x - self.cx as f64, y - self.cy as f64);
        (dx * dx + dy * dy).sqrt() <= self.radius as f64 + 1e-4
    }
}

/// Spatial moments of a closed polygon up to first order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Centroid truncated to integer pixels, `None` for degenerate shapes
    pub fn centroid(&self) -> Option<Point> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point::new(
            (self.m10 / self.m00) as i32,
            (self.m01 / self.m00) as i32,
        ))
    }
}

/// Area enclosed by a contour treated as a closed polygon (shoelace)
pub fn contour_area(points: &[Point]) -> f64 {
    polygon_moments(points).m00
}

/// Moments of a contour treated as a closed polygon, via Green's theorem
///
/// Orientation is normalized so `m00` is never negative. Single points and
/// straight lines have `m00 == 0`.
pub fn polygon_moments(points: &[Point]) -> Moments {
    let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
    if points.len() >= 3 {
        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            let (xi, yi, xj, yj) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += cross * (xi + xj);
            a01 += cross * (yi + yj);
        }
    }
    let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
    Moments {
        m00: sign * a00 / 2.0,
        m10: sign * a10 / 6.0,
        m01: sign * a01 / 6.0,
    }
}

fn circle_from_two(a: (f64, f64), b: (f64, f64)) -> Circle {
    let (cx, cy) = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
    let r = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt() / 2.0;
    Circle::new(cx as f32, cy as f32, r as f32)
}

fn circle_from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Circle {
    let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
    if d.abs() < 1e-12 {
        // collinear: the widest pair spans the circle
        let candidates = [circle_from_two(a, b), circle_from_two(a, c), circle_from_two(b, c)];
        return candidates
            .into_iter()
            .fold(Circle::new(0.0, 0.0, -1.0), |best, c| if c.radius > best.radius { c } else { best });
    }
    let sa = a.0 * a.0 + a.1 * a.1;
    let sb = b.0 * b.0 + b.1 * b.1;
    let sc = c.0 * c.0 + c.1 * c.1;
    let ux = (sa * (b.1 - c.1) + sb * (c.1 - a.1) + sc * (a.1 - b.1)) / d;
    let uy = (sa * (c.0 - b.0) + sb * (a.0 - c.0) + sc * (b.0 - a.0)) / d;
    let r = ((a.0 - ux).powi(2) + (a.1 - uy).powi(2)).sqrt();
    Circle::new(ux as f32, uy as f32, r as f32)
}

/// Smallest circle containing every point (incremental Welzl construction)
pub fn min_enclosing_circle(points: &[Point]) -> Option<Circle> {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let first = *pts.first()?;
    let mut circle = Circle::new(first.0 as f32, first.1 as f32, 0.0);

    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::new(pts[i].0 as f32, pts[i].1 as f32, 0.0);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = circle_from_two(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = circle_from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}
