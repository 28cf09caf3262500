//! # Shale Core
//!
//! The engine core: scheduled and random ticking, block behaviors, and the
//! update cascade that lets neighboring blocks react to each other. The
//! [`Level`] type ties the pieces together into a reference world backed by a
//! sparse position map.
//!
//! The engine is cooperatively single threaded: callbacks run one at a time
//! and may freely re-enter the level (place blocks, schedule ticks) because
//! no lock is held across a callback.
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

/// Block behavior dispatch and the built-in behavior set.
pub mod behavior;
/// Neighbor notification and signal propagation.
pub mod cascade;
/// The reference world.
pub mod level;
/// Engine tuning knobs.
pub mod settings;
/// Scheduled and random ticking.
pub mod ticks;

pub use cascade::CascadeError;
pub use level::Level;
pub use settings::{EngineSettings, SettingsError};
