//! Inspection hooks for live debugging.
//!
//! Hooks are called by whatever drives the step loop at fixed points to
//! capture metrics or snapshots without touching the integrator.

use morpho_solver::{SoftBody, StepReport};
use morpho_telemetry::events::{EventKind, SimulationEvent};
use morpho_telemetry::EventEmitter;

/// Trait for simulation inspection hooks.
///
/// # Lifecycle
///
/// ```text
/// hook.on_body_built(body)
/// for each step:
///   hook.on_step_begin(...)
///   body.calculate_acceleration(...)
///   hook.on_contacts(...)
///   hook.on_step_end(...)
/// hook.on_simulation_end()
/// ```
///
/// Hooks only read; they never change the body.
pub trait InspectionHook: Send {
    /// Called once after the body is constructed.
    fn on_body_built(&mut self, body: &SoftBody) {
        let _ = body;
    }

    /// Called before each step.
    fn on_step_begin(&mut self, step: u64, sim_time: f64) {
        let _ = (step, sim_time);
    }

    /// Called after the resolver ran for `step`.
    fn on_contacts(&mut self, step: u64, resolver: &str, active_contacts: usize) {
        let _ = (step, resolver, active_contacts);
    }

    /// Called after each step with its report.
    fn on_step_end(&mut self, report: &StepReport, body: &SoftBody) {
        let _ = (report, body);
    }

    /// Called when the simulation completes.
    fn on_simulation_end(&mut self) {}

    /// Returns the hook's name for logging.
    fn name(&self) -> &str;
}

/// Hook that turns lifecycle calls into telemetry events.
///
/// Events go straight to a bus when built with [`TelemetryHook::with_emitter`];
/// otherwise they are buffered until [`TelemetryHook::drain_events`].
pub struct TelemetryHook {
    events: Vec<SimulationEvent>,
    emitter: Option<EventEmitter>,
    /// Emit an `Energy` event every this many steps; 0 disables.
    energy_interval: u64,
}

impl TelemetryHook {
    /// Creates a buffering hook that records energy every step.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            emitter: None,
            energy_interval: 1,
        }
    }

    /// Creates a hook that forwards to an event bus.
    pub fn with_emitter(emitter: EventEmitter) -> Self {
        Self {
            emitter: Some(emitter),
            ..Self::new()
        }
    }

    /// Sets how often energy is sampled (0 disables it).
    pub fn energy_every(mut self, steps: u64) -> Self {
        self.energy_interval = steps;
        self
    }

    /// Drains buffered events.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    fn push(&mut self, step: u64, kind: EventKind) {
        let event = SimulationEvent::new(step, kind);
        match &self.emitter {
            Some(emitter) => {
                if !emitter.emit(event) {
                    tracing::debug!(step, "telemetry bus dropped, event discarded");
                }
            }
            None => self.events.push(event),
        }
    }
}

impl Default for TelemetryHook {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectionHook for TelemetryHook {
    fn on_body_built(&mut self, body: &SoftBody) {
        self.push(
            body.step_count(),
            EventKind::BodyBuilt {
                particles: body.particle_count(),
                links: body.link_count(),
                cells: body.cell_count(),
            },
        );
    }

    fn on_step_begin(&mut self, step: u64, sim_time: f64) {
        self.push(step, EventKind::StepBegin { sim_time });
    }

    fn on_contacts(&mut self, step: u64, resolver: &str, active_contacts: usize) {
        self.push(
            step,
            EventKind::ContactResolution {
                resolver: resolver.to_string(),
                active_contacts,
            },
        );
    }

    fn on_step_end(&mut self, report: &StepReport, body: &SoftBody) {
        if report.clamped_links > 0 || report.non_finite_particles > 0 {
            self.push(
                report.step,
                EventKind::NumericWarning {
                    clamped_links: report.clamped_links,
                    non_finite_particles: report.non_finite_particles,
                },
            );
        }
        if self.energy_interval > 0 && report.step % self.energy_interval == 0 {
            self.push(
                report.step,
                EventKind::Energy {
                    kinetic: body.kinetic_energy(),
                    elastic: body.elastic_energy(),
                },
            );
        }
        self.push(
            report.step,
            EventKind::StepEnd {
                wall_time: report.wall_time,
                substeps: report.substeps,
                max_velocity_change: report.max_velocity_change,
            },
        );
    }

    fn name(&self) -> &str {
        "telemetry_hook"
    }
}
