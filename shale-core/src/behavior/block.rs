//! The behavior trait and its dispatch table.

use std::sync::Arc;

use shale_registry::Registry;
use shale_utils::random::RandomSource;
use shale_utils::{BlockId, BlockPos, BlockStateId, Direction};

use crate::level::Level;

/// Reaction hooks a block kind can implement.
///
/// Every hook has a no-op default, so behaviors implement only what they
/// care about. Hooks receive the level and may re-enter it freely: place
/// blocks, schedule ticks, read neighbors. The level never holds a lock
/// while a hook runs.
pub trait BlockBehaviour: Send + Sync {
    /// Called once after this block has been written into the level.
    fn on_place(&self, _state: BlockStateId, _world: &Level, _pos: BlockPos) {}

    /// Called when a neighboring block changed.
    ///
    /// `source_pos` is the position that changed and `source_block` the block
    /// kind now occupying it.
    fn neighbor_changed(
        &self,
        _state: BlockStateId,
        _world: &Level,
        _pos: BlockPos,
        _source_block: BlockId,
        _source_pos: BlockPos,
    ) {
    }

    /// Lets this block pick a replacement for its own state when the
    /// neighbor toward `direction` changed. Returning `state` keeps it.
    ///
    /// The returned state must belong to the same block.
    fn update_shape(
        &self,
        state: BlockStateId,
        _world: &Level,
        _pos: BlockPos,
        _direction: Direction,
        _neighbor_pos: BlockPos,
        _neighbor_state: BlockStateId,
    ) -> BlockStateId {
        state
    }

    /// Fired by the fixed-delay tier, exactly the scheduled number of world
    /// ticks after scheduling.
    fn scheduled_tick(
        &self,
        _state: BlockStateId,
        _world: &Level,
        _pos: BlockPos,
        _random: &mut dyn RandomSource,
    ) {
    }

    /// Fired by the random tier when this position wins the sampling draw.
    fn random_tick(
        &self,
        _state: BlockStateId,
        _world: &Level,
        _pos: BlockPos,
        _random: &mut dyn RandomSource,
    ) {
    }

    /// Whether the given state takes part in random ticking. Only consulted
    /// for blocks whose config enables random ticks at all.
    fn is_randomly_ticking(&self, _registry: &Registry, _state: BlockStateId) -> bool {
        true
    }

    /// Signal strength this state emits toward `direction`, in `0..=15`.
    fn signal(&self, _registry: &Registry, _state: BlockStateId, _direction: Direction) -> u8 {
        0
    }
}

/// Behavior for blocks that react to nothing.
pub struct DefaultBehavior;

impl BlockBehaviour for DefaultBehavior {}

/// Dense dispatch table from block id to behavior.
///
/// Built once at startup next to the block registry and immutable
/// afterwards. Blocks without an entry get [`DefaultBehavior`].
pub struct BehaviorRegistry {
    table: Vec<Option<Arc<dyn BlockBehaviour>>>,
    fallback: Arc<dyn BlockBehaviour>,
}

impl BehaviorRegistry {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Vec::new(),
            fallback: Arc::new(DefaultBehavior),
        }
    }

    /// Registers `behavior` for `block`, replacing any previous entry.
    pub fn set(&mut self, block: BlockId, behavior: Arc<dyn BlockBehaviour>) {
        let index = block.0 as usize;
        if index >= self.table.len() {
            self.table.resize_with(index + 1, || None);
        }
        self.table[index] = Some(behavior);
    }

    /// The behavior registered for `block`, or the no-op fallback.
    #[must_use]
    pub fn get(&self, block: BlockId) -> &dyn BlockBehaviour {
        self.table
            .get(block.0 as usize)
            .and_then(|slot| slot.as_deref())
            .unwrap_or(&*self.fallback)
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantSignal(u8);

    impl BlockBehaviour for ConstantSignal {
        fn signal(&self, _registry: &Registry, _state: BlockStateId, _direction: Direction) -> u8 {
            self.0
        }
    }

    #[test]
    fn test_unregistered_block_gets_fallback() {
        let behaviors = BehaviorRegistry::new();
        let registry = Registry::new();
        let signal = behaviors
            .get(BlockId(9))
            .signal(&registry, Registry::AIR_STATE, Direction::Up);
        assert_eq!(signal, 0);
    }

    #[test]
    fn test_registered_behavior_is_dispatched() {
        let mut behaviors = BehaviorRegistry::new();
        let registry = Registry::new();
        behaviors.set(BlockId(3), Arc::new(ConstantSignal(15)));

        let signal = behaviors
            .get(BlockId(3))
            .signal(&registry, Registry::AIR_STATE, Direction::Up);
        assert_eq!(signal, 15);

        let other = behaviors
            .get(BlockId(2))
            .signal(&registry, Registry::AIR_STATE, Direction::Up);
        assert_eq!(other, 0);
    }

    #[test]
    fn test_set_replaces_previous_entry() {
        let mut behaviors = BehaviorRegistry::new();
        let registry = Registry::new();
        behaviors.set(BlockId(1), Arc::new(ConstantSignal(5)));
        behaviors.set(BlockId(1), Arc::new(ConstantSignal(9)));

        let signal = behaviors
            .get(BlockId(1))
            .signal(&registry, Registry::AIR_STATE, Direction::Down);
        assert_eq!(signal, 9);
    }
}
