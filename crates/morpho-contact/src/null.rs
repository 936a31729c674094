//! No-op resolver for bodies that never touch anything.

use morpho_solver::{CollisionResolver, ContactField, ParticleState};

/// Resolver that leaves every contact frame neutral.
///
/// Counts how often it was consulted, which makes it handy in tests and
/// benchmarks that only need to confirm the integrator calls it once per
/// step.
#[derive(Debug, Clone, Default)]
pub struct NullResolver {
    /// Number of `resolve` calls so far.
    pub calls: u64,
}

impl CollisionResolver for NullResolver {
    fn resolve(&mut self, _dt: f32, _state: &ParticleState, _field: &mut ContactField) -> usize {
        self.calls += 1;
        0
    }

    fn name(&self) -> &str {
        "null_resolver"
    }
}
