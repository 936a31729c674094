//! Debug line emission.

use morpho_math::{Affine3A, Vec3};

use crate::body::SoftBody;

impl SoftBody {
    /// Emits every link as a two-point segment transformed by `transform`.
    ///
    /// Read-only; the sink receives one `[start, end]` slice per link in
    /// link order.
    pub fn emit_debug_lines<F>(&self, transform: &Affine3A, mut sink: F)
    where
        F: FnMut(&[Vec3]),
    {
        let positions = &self.state.positions;
        for link in &self.topology.links {
            let segment = [
                transform.transform_point3(positions[link.m0.index()]),
                transform.transform_point3(positions[link.m1.index()]),
            ];
            sink(&segment);
        }
    }
}
