//! Debug line capture.

use morpho_math::{Affine3A, Vec3};
use morpho_solver::SoftBody;

/// Collects the segments a body emits through
/// [`SoftBody::emit_debug_lines`].
#[derive(Debug, Clone, Default)]
pub struct LineRecorder {
    /// Recorded `[start, end]` segments.
    pub segments: Vec<[Vec3; 2]>,
    /// Emitted slices that were not two points long.
    pub rejected: usize,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one emitted polyline slice; only 2-point slices are kept.
    pub fn push(&mut self, points: &[Vec3]) {
        match points {
            [a, b] => self.segments.push([*a, *b]),
            _ => self.rejected += 1,
        }
    }

    /// Clears, then records every link of `body` under `transform`.
    pub fn record(&mut self, body: &SoftBody, transform: &Affine3A) {
        self.clear();
        body.emit_debug_lines(transform, |points| self.push(points));
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.rejected = 0;
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(|[a, b]| a.distance(*b)).sum()
    }

    /// Axis-aligned bounds of all endpoints, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.segments.iter().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
    }
}
