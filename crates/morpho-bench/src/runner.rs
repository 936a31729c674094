//! Benchmark runner: builds a scenario's body, steps it and collects metrics.

use std::time::Instant;

use tracing::info;

use morpho_contact::NullResolver;
use morpho_debug::hooks::InspectionHook;
use morpho_solver::{CollisionResolver, SoftBody};
use morpho_types::MorphoResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario, driving `hook` through its lifecycle if given.
    ///
    /// Fails only if the scenario's mesh does not build into a body.
    pub fn run(
        scenario: &Scenario,
        mut hook: Option<&mut dyn InspectionHook>,
    ) -> MorphoResult<BenchmarkMetrics> {
        let mut body = SoftBody::build(&scenario.mesh, scenario.config.clone())?;
        if let Some(h) = hook.as_deref_mut() {
            h.on_body_built(&body);
        }

        let mut carrier = scenario.carrier.clone();
        let mut ground = scenario.ground.clone();
        let mut none = NullResolver::default();
        let resolver: &mut dyn CollisionResolver = match ground.as_mut() {
            Some(g) => g,
            None => &mut none,
        };

        let initial = body.positions().to_vec();
        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.timesteps as usize);
        let mut clamped_links = 0;
        let mut peak_contacts = 0;
        let mut non_finite_particles = 0;

        let total_start = Instant::now();

        for step in 0..u64::from(scenario.timesteps) {
            if let Some(h) = hook.as_deref_mut() {
                h.on_step_begin(step, step as f64 * f64::from(scenario.dt));
            }

            carrier.apply_force(scenario.carrier_force);
            if step == 0 {
                carrier.apply_torque(scenario.torque_impulse);
            }
            let report = body.calculate_acceleration(scenario.dt, &mut carrier, &mut *resolver);

            step_times.push(report.wall_time);
            clamped_links += report.clamped_links;
            peak_contacts = peak_contacts.max(report.active_contacts);
            non_finite_particles = report.non_finite_particles;

            if let Some(h) = hook.as_deref_mut() {
                h.on_contacts(step, resolver.name(), report.active_contacts);
                h.on_step_end(&report, &body);
            }
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();
        if let Some(h) = hook.as_deref_mut() {
            h.on_simulation_end();
        }

        let max_displacement = body
            .positions()
            .iter()
            .zip(&initial)
            .map(|(p, p0)| (*p - *p0).length())
            .fold(0.0f32, f32::max);
        let final_min_height = body
            .positions()
            .iter()
            .map(|p| p.y)
            .fold(f32::INFINITY, f32::min);

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);

        let metrics = BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            total_wall_time,
            timesteps: scenario.timesteps,
            avg_step_time: avg_step,
            min_step_time: min_step,
            max_step_time: max_step,
            final_kinetic_energy: body.kinetic_energy(),
            final_elastic_energy: body.elastic_energy(),
            max_displacement,
            final_min_height,
            volume_drift: body.volume_drift(),
            clamped_links,
            peak_contacts,
            non_finite_particles,
            particle_count: body.particle_count(),
            link_count: body.link_count(),
            cell_count: body.cell_count(),
        };
        info!(
            scenario = %metrics.scenario,
            steps = metrics.timesteps,
            avg_step_ms = metrics.avg_step_time * 1000.0,
            max_displacement = metrics.max_displacement,
            "benchmark finished"
        );
        Ok(metrics)
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all() -> MorphoResult<Vec<BenchmarkMetrics>> {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&Scenario::from_kind(kind), None))
            .collect()
    }
}
