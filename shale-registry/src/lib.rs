//! # Shale Registry
//!
//! Block descriptors, typed state properties and the interned block state
//! table. Every legal combination of property values is assigned exactly one
//! `BlockStateId`, so states are compared and stored as plain `u16`s and
//! "modifying" a state is pure id arithmetic.
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

/// Block descriptors and the registration builder.
pub mod block;
/// Typed state properties.
pub mod properties;
/// The block registry.
pub mod registry;
/// Interned state layout and the get/set/cycle operations.
pub mod state;

pub use block::{Block, BlockBuilder, BlockConfig};
pub use properties::{BoolProperty, EnumProperty, IntProperty, Property, PropertyEnum};
pub use registry::{Registry, RegistryError};
pub use state::{StateDefinition, StateError};
