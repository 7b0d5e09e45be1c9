use crate::geometry::Point;
use std::collections::VecDeque;

/// One line of the trail between two consecutive detected centers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    /// 1-based position of `to` counted from the newest entry
    pub rank: usize,
    pub from: Point,
    pub to: Point,
    pub thickness: u32,
}

/// Bounded history of detected centers, newest first
///
/// Frames without a detection are kept as `None` so the trail breaks where
/// the object was lost.
#[derive(Debug, Clone)]
pub struct TrajectoryBuffer {
    points: VecDeque<Option<Point>>,
    capacity: usize,
    thickness_scale: f32,
}

impl TrajectoryBuffer {
    pub fn new(capacity: usize, thickness_scale: f32) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            thickness_scale,
        }
    }

    /// Adds the newest entry, dropping the oldest once over capacity
    pub fn push(&mut self, point: Option<Point>) {
        self.points.push_front(point);
        self.points.truncate(self.capacity);
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &Option<Point>> {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<Point> {
        self.points.front().copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Line thickness for the segment ending at `rank`, thinning with age
    pub fn thickness(&self, rank: usize) -> u32 {
        let ratio = self.capacity as f32 / (rank + 1) as f32;
        ((ratio.sqrt() * self.thickness_scale).round() as u32).max(1)
    }

    /// Segments between adjacent entries where both have a point
    pub fn segments(&self) -> impl Iterator<Item = TrailSegment> + '_ {
        (1..self.points.len()).filter_map(move |rank| {
            match (self.points[rank - 1], self.points[rank]) {
                (Some(from), Some(to)) => Some(TrailSegment {
                    rank,
                    from,
                    to,
                    thickness: self.thickness(rank),
                }),
                _ => None,
            }
        })
    }
}
