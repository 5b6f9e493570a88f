//! Step graph derivation: I/O inference and connection resolution.
//!
//! Takes fielded step records and derives the data-flow view the hub
//! renders as a node graph: per-step inferred inputs/outputs
//! ([`infer_io`]) and directed edges between adjacent steps
//! ([`resolve_connections`]). Everything here is derived data,
//! recomputed on demand; nothing is persisted.

pub mod connect;
pub mod infer;

use docflow_shared::{StepIo, StepRecord};

pub use connect::resolve_connections;
pub use infer::infer_io;

/// Infer I/O for every step record, in order.
pub fn infer_all(steps: &[StepRecord]) -> Vec<StepIo> {
    steps
        .iter()
        .map(|step| infer_io(&step.instruction, &step.deliverable, step.number))
        .collect()
}
