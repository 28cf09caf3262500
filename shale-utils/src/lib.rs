//! # Shale Utils
//!
//! Shared primitives for the shale engine: grid positions, directions,
//! id wrapper types and deterministic random sources.
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata
)]

/// Cardinal direction enum and neighbor iteration order.
pub mod direction;
/// Small fixed-size vector math.
pub mod math;
/// Wrapper types shared across the engine crates.
pub mod types;

/// Deterministic random sources.
pub mod random;

pub use direction::Direction;
pub use types::{BlockId, BlockPos, BlockStateId, Identifier, SectionPos, UpdateFlags};
