//! # morpho-debug
//!
//! Inspection hooks, debug line capture and state snapshots for
//! debugging soft-body simulations. Snapshots serialize to binary for
//! replay and diffing.

pub mod hooks;
pub mod lines;
pub mod snapshot;

pub use hooks::{InspectionHook, TelemetryHook};
pub use lines::LineRecorder;
pub use snapshot::StateSnapshot;
