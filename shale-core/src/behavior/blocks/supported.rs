//! A block that needs support from below.

use shale_registry::Registry;
use shale_utils::random::RandomSource;
use shale_utils::{BlockId, BlockPos, BlockStateId, Direction, UpdateFlags};

use crate::behavior::BlockBehaviour;
use crate::level::Level;

/// Requires a non-air block directly below and breaks otherwise.
///
/// Losing support does not break the block immediately: the behavior
/// schedules a one-tick re-check, so a support swapped back within the same
/// tick survives.
pub struct SupportedBlock {
    block: BlockId,
}

impl SupportedBlock {
    const RECHECK_DELAY: u32 = 1;

    /// Creates the behavior for the block registered as `block`.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }

    fn supported(world: &Level, pos: BlockPos) -> bool {
        !world.is_air(pos.relative(Direction::Down))
    }
}

impl BlockBehaviour for SupportedBlock {
    fn neighbor_changed(
        &self,
        _state: BlockStateId,
        world: &Level,
        pos: BlockPos,
        _source_block: BlockId,
        _source_pos: BlockPos,
    ) {
        if !Self::supported(world, pos) && !world.has_scheduled_tick(pos, self.block) {
            world.schedule_tick(pos, self.block, Self::RECHECK_DELAY);
        }
    }

    fn scheduled_tick(
        &self,
        _state: BlockStateId,
        world: &Level,
        pos: BlockPos,
        _random: &mut dyn RandomSource,
    ) {
        if !Self::supported(world, pos) {
            world.set_block(pos, Registry::AIR_STATE, UpdateFlags::UPDATE_ALL);
        }
    }
}
