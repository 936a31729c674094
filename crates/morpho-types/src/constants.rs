//! Physical constants and simulation defaults.

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Default number of integrator sub-steps per world step.
pub const DEFAULT_SUBSTEPS: u32 = 4;

/// Shared spring constant, in s⁻² (a unit acceleration, not a force).
pub const DEFAULT_SPRING_STIFFNESS: f32 = 1000.0;

/// Shared damper constant, in s⁻¹ (a unit velocity rate, not a force).
pub const DEFAULT_DAMPER: f32 = 30.0;

/// Volumetric stiffness the cell constraint was tuned with.
///
/// Only stable for timesteps well below 1/60 s at the default sub-step
/// count, so the integrator ships with the volumetric term disabled.
pub const REFERENCE_VOLUMETRIC_STIFFNESS: f32 = 200_000.0;

/// Absolute per-component tolerance for welding coincident vertices.
pub const WELD_TOLERANCE: f32 = 1.0e-5;

/// Maximum depth of the explicit stack used to flood-fill one cell.
pub const MAX_FAN_STACK: usize = 32;

/// Fraction of the shortest rest length used as the link-length floor.
pub const SMALLEST_LENGTH_FRACTION: f32 = 0.1;

/// Rest lengths at or below this are rejected as degenerate.
pub const DEGENERATE_LENGTH_THRESHOLD: f32 = 1.0e-6;

/// Rest volumes (scaled triple product) at or below this are rejected.
pub const DEGENERATE_VOLUME_THRESHOLD: f32 = 1.0e-10;
