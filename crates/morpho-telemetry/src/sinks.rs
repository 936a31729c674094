//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them (collect in
//! memory, forward to `tracing`, ...).

use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events in memory for testing and inspection.
///
/// Clones share the same buffer, so a clone kept outside the bus sees
/// everything the boxed sink receives.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
    finalized: Arc<Mutex<bool>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far.
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `finalize` has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized.lock().map(|f| *f).unwrap_or(false)
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn finalize(&mut self) {
        if let Ok(mut finalized) = self.finalized.lock() {
            *finalized = true;
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to the `tracing` subscriber at a fixed level.
///
/// Numeric warnings are always logged at `WARN` or above.
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        let level = if event.is_warning() && self.level > Level::WARN {
            Level::WARN
        } else {
            self.level
        };
        let step = event.step;
        let kind = event.kind.label();
        let payload = &event.kind;
        if level == Level::ERROR {
            tracing::error!(step, kind, event = ?payload, "simulation_event");
        } else if level == Level::WARN {
            tracing::warn!(step, kind, event = ?payload, "simulation_event");
        } else if level == Level::INFO {
            tracing::info!(step, kind, event = ?payload, "simulation_event");
        } else if level == Level::DEBUG {
            tracing::debug!(step, kind, event = ?payload, "simulation_event");
        } else {
            tracing::trace!(step, kind, event = ?payload, "simulation_event");
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
