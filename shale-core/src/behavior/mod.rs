//! Block behaviors.
//!
//! A behavior is a bundle of reaction hooks for one block kind: neighbor
//! notifications, shape updates, scheduled and random ticks, and signal
//! emission. Behaviors are plain trait objects kept in a dense dispatch
//! table keyed by block id; block definitions themselves stay pure data.

mod block;
pub mod blocks;

pub use block::{BehaviorRegistry, BlockBehaviour, DefaultBehavior};
