//! Event bus: producer/consumer dispatch to pluggable sinks.
//!
//! Producers push events into an `mpsc` channel; [`EventBus::flush`]
//! drains it into every registered sink. Extra producers, for instance
//! on worker threads, can hold a cloned [`EventEmitter`].

use std::sync::mpsc;

use crate::events::{EventKind, SimulationEvent};
use crate::sinks::EventSink;

/// Cloneable producer handle for an [`EventBus`].
#[derive(Debug, Clone)]
pub struct EventEmitter {
    sender: mpsc::Sender<SimulationEvent>,
}

impl EventEmitter {
    /// Sends an event. Returns false if the bus is gone.
    pub fn emit(&self, event: SimulationEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Event bus for simulation telemetry.
pub struct EventBus {
    sender: mpsc::Sender<SimulationEvent>,
    receiver: mpsc::Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// Disabled bus drops events at `emit`.
    enabled: bool,
    dispatched: u64,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            enabled: true,
            dispatched: 0,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Enables or disables the bus. Disabled bus drops events silently.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Producer handle that feeds this bus.
    ///
    /// Emitters bypass the enable flag; it only gates [`EventBus::emit`].
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            sender: self.sender.clone(),
        }
    }

    /// Emit an event. If the bus is disabled, this is a no-op.
    pub fn emit(&self, event: SimulationEvent) {
        if !self.enabled {
            return;
        }
        // The receiver lives in `self`, so the send cannot fail.
        let _ = self.sender.send(event);
    }

    /// Shorthand for `emit(SimulationEvent::new(step, kind))`.
    pub fn emit_kind(&self, step: u64, kind: EventKind) {
        self.emit(SimulationEvent::new(step, kind));
    }

    /// Delivers all pending events to every sink and returns how many
    /// events were drained.
    pub fn flush(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            drained += 1;
        }
        self.dispatched += drained as u64;
        drained
    }

    /// Flushes, then lets every sink finalize.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Total events delivered by `flush` so far.
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
