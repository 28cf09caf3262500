//! Scheduled and random ticking.
//!
//! Blocks receive future updates through two independent tiers:
//!
//! - The fixed-delay tier fires a callback an exact number of world ticks
//!   after scheduling, ordered by trigger tick, priority and insertion order.
//! - The random tier samples loaded positions probabilistically each world
//!   tick; it keeps no queue and promises nothing about per-position timing.
//!
//! # Architecture
//!
//! - [`ScheduledTick`] - A single scheduled tick entry
//! - [`TickPriority`] - Priority for ordering ticks within the same world tick
//! - [`ChunkTickQueue`] - Per-section tick storage
//! - [`TickScheduler`] - Level-wide coordinator over all section queues
//! - [`RandomTickSampler`] - The per-position roll of the random tier

mod chunk_queue;
mod random_tick;
mod scheduled_tick;
mod scheduler;

pub use chunk_queue::ChunkTickQueue;
pub use random_tick::{RANDOM_TICK_SAMPLE_SPACE, RandomTickSampler};
pub use scheduled_tick::{ScheduledTick, TickKey, TickPriority};
pub use scheduler::TickScheduler;
