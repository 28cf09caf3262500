//! A self-spreading block, fluid style.

use shale_registry::IntProperty;
use shale_utils::random::RandomSource;
use shale_utils::{BlockId, BlockPos, BlockStateId, Direction, UpdateFlags};

use crate::behavior::BlockBehaviour;
use crate::level::Level;

/// Spreads copies of itself into replaceable neighbors, one level weaker
/// per copy, until its level runs out.
///
/// Spreading rides the fixed-delay tier: placing a copy schedules that
/// copy's own front, so a pool grows one ring every `spread_delay` world
/// ticks. Already-placed copies are left alone, which keeps the growth
/// monotone.
pub struct SpreadingBlock {
    block: BlockId,
    spread_delay: u32,
}

impl SpreadingBlock {
    /// Remaining spread strength; a level-0 copy no longer spreads.
    pub const LEVEL: IntProperty = IntProperty::new("level", 0, 7);

    /// Down first, then the horizontal ring.
    const SPREAD_ORDER: [Direction; 5] = [
        Direction::Down,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Creates the behavior for `block`, spreading every `spread_delay`
    /// world ticks.
    #[must_use]
    pub const fn new(block: BlockId, spread_delay: u32) -> Self {
        Self {
            block,
            spread_delay,
        }
    }
}

impl BlockBehaviour for SpreadingBlock {
    fn on_place(&self, _state: BlockStateId, world: &Level, pos: BlockPos) {
        if !world.has_scheduled_tick(pos, self.block) {
            world.schedule_tick(pos, self.block, self.spread_delay);
        }
    }

    fn scheduled_tick(
        &self,
        state: BlockStateId,
        world: &Level,
        pos: BlockPos,
        _random: &mut dyn RandomSource,
    ) {
        let level = world.registry().get_value(state, &Self::LEVEL);
        if level == 0 {
            return;
        }
        let spread_state = world.registry().set_value(state, &Self::LEVEL, level - 1);

        for direction in Self::SPREAD_ORDER {
            let target = pos.relative(direction);
            let occupant = world.registry().block_of_state(world.block_state(target));
            if !occupant.config.replaceable || occupant.id() == self.block {
                continue;
            }
            // The copy's on_place schedules its own front.
            world.set_block(target, spread_state, UpdateFlags::UPDATE_ALL);
        }
    }
}
