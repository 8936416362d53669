//! Context assembly for the planner.
//!
//! Prior turns are rendered oldest first, each tagged with its role, and
//! followed by the current request. An optional character budget trims the
//! oldest turns.

pub mod assembler;

pub use assembler::{AssembledContext, ContextAssembler};
