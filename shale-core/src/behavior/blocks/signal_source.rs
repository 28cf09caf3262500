//! A toggleable constant-strength signal emitter.

use shale_registry::{BoolProperty, Registry};
use shale_utils::{BlockPos, BlockStateId, Direction, UpdateFlags};

use crate::behavior::BlockBehaviour;
use crate::level::Level;

/// Emits a fixed signal strength while lit.
pub struct SignalSource {
    strength: u8,
}

impl SignalSource {
    /// Whether the source currently emits.
    pub const LIT: BoolProperty = BoolProperty::new("lit");

    /// Creates a source emitting `strength` while lit.
    #[must_use]
    pub const fn new(strength: u8) -> Self {
        Self { strength }
    }

    /// Toggles the source at `pos` and notifies the neighborhood.
    ///
    /// # Panics
    /// Panics if `pos` does not hold a block carrying the `lit` property.
    pub fn pulse(world: &Level, pos: BlockPos) {
        let state = world.block_state(pos);
        let toggled = world.registry().cycle(state, &Self::LIT);
        world.set_block(pos, toggled, UpdateFlags::UPDATE_ALL);
    }
}

impl BlockBehaviour for SignalSource {
    fn signal(&self, registry: &Registry, state: BlockStateId, _direction: Direction) -> u8 {
        if registry.get_value(state, &Self::LIT) {
            self.strength
        } else {
            0
        }
    }
}
