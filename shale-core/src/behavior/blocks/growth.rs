//! A block that matures through random ticks.

use shale_registry::{IntProperty, Registry};
use shale_utils::random::RandomSource;
use shale_utils::{BlockPos, BlockStateId, UpdateFlags};

use crate::behavior::BlockBehaviour;
use crate::level::Level;

/// Ages one step per winning random tick, then goes dormant.
///
/// Maturing is additionally gated by a 1-in-`growth_odds` roll on the
/// tick's random stream, so average maturation time is tunable
/// independently of the sampler speed. Fully grown states opt out of
/// random ticking altogether.
pub struct GrowthBlock {
    growth_odds: i32,
}

impl GrowthBlock {
    /// Fully grown age.
    pub const MAX_AGE: u8 = 3;

    /// Maturity, 0 through [`Self::MAX_AGE`].
    pub const AGE: IntProperty = IntProperty::new("age", 0, Self::MAX_AGE);

    /// Creates the behavior with a 1-in-`growth_odds` chance to mature per
    /// winning random tick.
    ///
    /// # Panics
    /// Panics if `growth_odds` is not positive.
    #[must_use]
    pub const fn new(growth_odds: i32) -> Self {
        assert!(growth_odds > 0);
        Self { growth_odds }
    }
}

impl BlockBehaviour for GrowthBlock {
    fn random_tick(
        &self,
        state: BlockStateId,
        world: &Level,
        pos: BlockPos,
        random: &mut dyn RandomSource,
    ) {
        let age = world.registry().get_value(state, &Self::AGE);
        if age >= Self::MAX_AGE || random.next_i32_bounded(self.growth_odds) != 0 {
            return;
        }
        let grown = world.registry().set_value(state, &Self::AGE, age + 1);
        world.set_block(pos, grown, UpdateFlags::UPDATE_NEIGHBORS);
    }

    fn is_randomly_ticking(&self, registry: &Registry, state: BlockStateId) -> bool {
        registry.get_value(state, &Self::AGE) < Self::MAX_AGE
    }
}
