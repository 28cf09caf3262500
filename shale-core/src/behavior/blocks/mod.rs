//! The built-in behavior set.
//!
//! Small, composable behaviors that together exercise every engine hook:
//! support checks, signal conduction, pulsed emitters, scheduled spreading,
//! random-tick growth and property cycling.

mod growth;
mod signal_source;
mod signal_wire;
mod spreading;
mod supported;
mod toggle;

pub use growth::GrowthBlock;
pub use signal_source::SignalSource;
pub use signal_wire::SignalWire;
pub use spreading::SpreadingBlock;
pub use supported::SupportedBlock;
pub use toggle::{ToggleBlock, ToggleMode};
