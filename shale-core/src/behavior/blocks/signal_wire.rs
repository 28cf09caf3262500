//! Signal-conducting wire.

use shale_registry::{IntProperty, Registry};
use shale_utils::{BlockId, BlockPos, BlockStateId, Direction, UpdateFlags};

use crate::behavior::BlockBehaviour;
use crate::cascade::MAX_SIGNAL;
use crate::level::Level;

/// A conductor carrying the strongest neighboring signal onward, one
/// strength weaker per hop.
///
/// The wire emits its carried power equally in all six directions; whenever
/// a neighbor changes it recomputes `power` from scratch and republishes
/// itself, which is what walks a signal front down a line of wire.
pub struct SignalWire;

impl SignalWire {
    /// Carried signal strength.
    pub const POWER: IntProperty = IntProperty::new("power", 0, MAX_SIGNAL);

    /// Recomputes this wire's power and republishes it when it changed.
    fn refresh(world: &Level, pos: BlockPos, state: BlockStateId) {
        let power = world.incoming_signal(pos).saturating_sub(1);
        if power != world.registry().get_value(state, &Self::POWER) {
            let updated = world.registry().set_value(state, &Self::POWER, power);
            world.set_block(pos, updated, UpdateFlags::UPDATE_ALL);
        }
    }
}

impl BlockBehaviour for SignalWire {
    fn on_place(&self, state: BlockStateId, world: &Level, pos: BlockPos) {
        Self::refresh(world, pos, state);
    }

    fn neighbor_changed(
        &self,
        state: BlockStateId,
        world: &Level,
        pos: BlockPos,
        _source_block: BlockId,
        _source_pos: BlockPos,
    ) {
        Self::refresh(world, pos, state);
    }

    fn signal(&self, registry: &Registry, state: BlockStateId, _direction: Direction) -> u8 {
        registry.get_value(state, &Self::POWER)
    }
}
