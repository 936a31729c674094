//! Metrics collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Number of timesteps executed.
    pub timesteps: u32,
    /// Average wall-clock time per timestep (seconds).
    pub avg_step_time: f64,
    /// Minimum step time.
    pub min_step_time: f64,
    /// Maximum step time.
    pub max_step_time: f64,
    /// Final kinetic energy.
    pub final_kinetic_energy: f64,
    /// Final spring potential.
    pub final_elastic_energy: f64,
    /// Maximum particle displacement from its initial position.
    pub max_displacement: f32,
    /// Lowest particle height at the end of the run.
    pub final_min_height: f32,
    /// Final summed deviation of cell volumes from rest.
    pub volume_drift: f64,
    /// Floor-clamped link evaluations over the whole run.
    pub clamped_links: usize,
    /// Most particles in contact during a single step.
    pub peak_contacts: usize,
    /// Non-finite particles after the last step.
    pub non_finite_particles: usize,
    /// Particle count.
    pub particle_count: usize,
    /// Link count.
    pub link_count: usize,
    /// Cell count.
    pub cell_count: usize,
}

impl BenchmarkMetrics {
    /// Format as a CSV row (header + data).
    pub fn to_csv_header() -> String {
        "scenario,particle_count,link_count,cell_count,timesteps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,final_ke,final_elastic,max_displacement,final_min_height,volume_drift,clamped_links,peak_contacts,non_finite".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.6e},{:.6e},{:.6},{:.6},{:.6e},{},{},{}",
            self.scenario,
            self.particle_count,
            self.link_count,
            self.cell_count,
            self.timesteps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.final_kinetic_energy,
            self.final_elastic_energy,
            self.max_displacement,
            self.final_min_height,
            self.volume_drift,
            self.clamped_links,
            self.peak_contacts,
            self.non_finite_particles,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }

    /// True when the run ended with every particle finite.
    pub fn is_finite(&self) -> bool {
        self.non_finite_particles == 0
            && self.final_kinetic_energy.is_finite()
            && self.max_displacement.is_finite()
    }
}
