//! A block stepping through a small mode wheel.

use shale_registry::{EnumProperty, PropertyEnum};
use shale_utils::{BlockPos, UpdateFlags};

use crate::behavior::BlockBehaviour;
use crate::level::Level;

/// Operating mode of a [`ToggleBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMode {
    /// Doing nothing.
    Off,
    /// Running at half strength.
    Low,
    /// Running at full strength.
    High,
}

impl PropertyEnum for ToggleMode {
    const VALUES: &'static [Self] = &[ToggleMode::Off, ToggleMode::Low, ToggleMode::High];

    fn name(self) -> &'static str {
        match self {
            ToggleMode::Off => "off",
            ToggleMode::Low => "low",
            ToggleMode::High => "high",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Advances its mode wheel when pulsed, wrapping after the last mode.
pub struct ToggleBlock;

impl ToggleBlock {
    /// The current mode.
    pub const MODE: EnumProperty<ToggleMode> = EnumProperty::new("mode");

    /// Steps the mode wheel at `pos` and notifies the neighborhood.
    ///
    /// # Panics
    /// Panics if `pos` does not hold a block carrying the `mode` property.
    pub fn pulse(world: &Level, pos: BlockPos) {
        let state = world.block_state(pos);
        let next = world.registry().cycle(state, &Self::MODE);
        world.set_block(pos, next, UpdateFlags::UPDATE_ALL);
    }
}

impl BlockBehaviour for ToggleBlock {}
