//! Block placement and the neighbor update cascade.
//!
//! Placement and propagation live here as a second `impl Level` block so
//! `level.rs` stays focused on storage and ticking.

use std::sync::atomic::Ordering;

use smallvec::SmallVec;

use shale_registry::Registry;
use shale_utils::{BlockId, BlockPos, BlockStateId, Direction, UpdateFlags};

use crate::level::Level;

/// The strongest signal a block can emit.
pub const MAX_SIGNAL: u8 = 15;

/// Failure surfaced by [`Level::try_set_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CascadeError {
    /// A chain of nested updates hit the configured depth bound and the
    /// branch was cut off.
    #[error("update cascade exceeded the configured depth of {max_depth}")]
    DepthExceeded {
        /// The bound that was hit.
        max_depth: u32,
    },
}

impl Level {
    /// Places `state` at `pos` and runs the update cascade per `flags`.
    ///
    /// Returns whether the stored state changed; placing the state already
    /// present is a no-op. A cascade running deeper than the configured
    /// `max_cascade_depth` has that branch cut off with a warning; use
    /// [`Self::try_set_block`] to observe the cutoff instead.
    pub fn set_block(&self, pos: BlockPos, state: BlockStateId, flags: UpdateFlags) -> bool {
        match self.try_set_block(pos, state, flags) {
            Ok(changed) => changed,
            Err(err) => {
                log::warn!("truncating update cascade at {pos}: {err}");
                false
            }
        }
    }

    /// Like [`Self::set_block`], but reports a depth cutoff to the caller
    /// instead of logging it.
    pub fn try_set_block(
        &self,
        pos: BlockPos,
        state: BlockStateId,
        flags: UpdateFlags,
    ) -> Result<bool, CascadeError> {
        let max_depth = self.settings().max_cascade_depth;
        let depth = self.cascade_depth.fetch_add(1, Ordering::Relaxed);
        if depth >= max_depth as usize {
            self.cascade_depth.fetch_sub(1, Ordering::Relaxed);
            return Err(CascadeError::DepthExceeded { max_depth });
        }
        let changed = self.set_block_inner(pos, state, flags);
        self.cascade_depth.fetch_sub(1, Ordering::Relaxed);
        Ok(changed)
    }

    fn set_block_inner(&self, pos: BlockPos, state: BlockStateId, flags: UpdateFlags) -> bool {
        let placing_air = self.registry().is_air(state);

        let old = {
            let mut blocks = self.blocks.write();
            if placing_air {
                blocks.remove(&pos).unwrap_or(Registry::AIR_STATE)
            } else {
                blocks.insert(pos, state).unwrap_or(Registry::AIR_STATE)
            }
        };
        if old == state {
            return false;
        }

        let was_air = self.registry().is_air(old);
        if was_air != placing_air {
            let section = pos.section();
            let mut occupancy = self.occupancy.write();
            if placing_air {
                if let Some(count) = occupancy.get_mut(&section) {
                    *count -= 1;
                    if *count == 0 {
                        occupancy.remove(&section);
                    }
                }
            } else {
                *occupancy.entry(section).or_insert(0) += 1;
            }
        }

        let placed = self.registry().block_of_state(state);
        log::trace!("{pos} <- {}", placed.describe_state(state));

        let placed_block = placed.id();
        if !placing_air {
            self.behaviors().get(placed_block).on_place(state, self, pos);
        }

        if flags.contains(UpdateFlags::UPDATE_NEIGHBORS) {
            self.update_neighbors(pos, placed_block);
        }
        if flags.contains(UpdateFlags::UPDATE_SHAPE) {
            self.update_shapes_around(pos, state, flags);
        }
        true
    }

    /// Notifies the six neighbors of `pos` that it changed, in canonical
    /// direction order (Down, Up, North, South, West, East).
    ///
    /// Air neighbors are skipped, which is what grounds removal cascades:
    /// once a position is air, nothing reacts there any more. Each
    /// neighbor's state is read fresh before its callback, so a neighbor
    /// removed earlier in the pass no longer hears about the change.
    pub fn update_neighbors(&self, pos: BlockPos, source_block: BlockId) {
        for direction in Direction::ALL {
            let neighbor_pos = pos.relative(direction);
            let neighbor_state = self.block_state(neighbor_pos);
            if self.registry().is_air(neighbor_state) {
                continue;
            }
            let neighbor_block = self.registry().block_of_state(neighbor_state).id();
            self.behaviors().get(neighbor_block).neighbor_changed(
                neighbor_state,
                self,
                neighbor_pos,
                source_block,
                pos,
            );
        }
    }

    /// Asks each neighbor of `pos` for a shape replacement after `pos`
    /// changed to `state`, applying replacements with the same flags.
    fn update_shapes_around(&self, pos: BlockPos, state: BlockStateId, flags: UpdateFlags) {
        for direction in Direction::ALL {
            let neighbor_pos = pos.relative(direction);
            let neighbor_state = self.block_state(neighbor_pos);
            if self.registry().is_air(neighbor_state) {
                continue;
            }
            let neighbor_block = self.registry().block_of_state(neighbor_state).id();
            let replacement = self.behaviors().get(neighbor_block).update_shape(
                neighbor_state,
                self,
                neighbor_pos,
                direction.opposite(),
                pos,
                state,
            );
            if replacement != neighbor_state {
                self.set_block(neighbor_pos, replacement, flags);
            }
        }
    }

    /// The strongest signal any neighbor emits toward `pos`.
    ///
    /// Merging is max, never sum: inputs of 0, 7, 15 and 3 merge to 15.
    /// Emission is a pure query on the neighbor's behavior, so all six
    /// states are snapshotted under one read lock.
    #[must_use]
    pub fn incoming_signal(&self, pos: BlockPos) -> u8 {
        let neighbors: SmallVec<[(Direction, BlockStateId); 6]> = {
            let blocks = self.blocks.read();
            Direction::ALL
                .into_iter()
                .map(|direction| {
                    let neighbor_pos = pos.relative(direction);
                    let state = blocks
                        .get(&neighbor_pos)
                        .copied()
                        .unwrap_or(Registry::AIR_STATE);
                    (direction, state)
                })
                .collect()
        };

        let mut strongest = 0;
        for (direction, neighbor_state) in neighbors {
            if self.registry().is_air(neighbor_state) {
                continue;
            }
            let neighbor_block = self.registry().block_of_state(neighbor_state).id();
            // opposite() points from the neighbor back toward pos.
            let signal = self.behaviors().get(neighbor_block).signal(
                self.registry(),
                neighbor_state,
                direction.opposite(),
            );
            strongest = strongest.max(signal);
        }
        strongest
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use parking_lot::Mutex;
    use shale_registry::{BlockBuilder, BlockConfig};
    use shale_utils::Identifier;

    use super::*;
    use crate::behavior::{BehaviorRegistry, BlockBehaviour};
    use crate::settings::EngineSettings;

    struct RecordingBehavior {
        heard: Mutex<Vec<(BlockPos, BlockPos)>>,
    }

    impl BlockBehaviour for RecordingBehavior {
        fn neighbor_changed(
            &self,
            _state: BlockStateId,
            _world: &Level,
            pos: BlockPos,
            _source_block: BlockId,
            source_pos: BlockPos,
        ) {
            self.heard.lock().push((pos, source_pos));
        }
    }

    struct Emitter {
        strength: u8,
    }

    impl BlockBehaviour for Emitter {
        fn signal(&self, _registry: &Registry, _state: BlockStateId, _direction: Direction) -> u8 {
            self.strength
        }
    }

    /// Places another copy of itself one step east, forever. Only the depth
    /// valve stops it.
    struct Runaway {
        block: BlockId,
    }

    impl BlockBehaviour for Runaway {
        fn on_place(&self, _state: BlockStateId, world: &Level, pos: BlockPos) {
            let next = pos.relative(Direction::East);
            world.set_block(
                next,
                world.registry().default_state(self.block),
                UpdateFlags::empty(),
            );
        }
    }

    fn quiet() -> EngineSettings {
        EngineSettings {
            random_tick_speed: 0,
            ..EngineSettings::default()
        }
    }

    fn bare_level() -> (Level, BlockId) {
        let mut registry = Registry::new();
        let stone = registry
            .register(BlockBuilder::new(Identifier::shale("stone")))
            .unwrap();
        let level = Level::new(
            Arc::new(registry),
            Arc::new(BehaviorRegistry::new()),
            quiet(),
        );
        (level, stone)
    }

    #[test]
    fn test_set_block_reports_change() {
        let (level, stone) = bare_level();
        let pos = BlockPos::new(1, 2, 3);
        let state = level.registry().default_state(stone);

        assert!(level.set_block(pos, state, UpdateFlags::UPDATE_ALL));
        assert!(!level.set_block(pos, state, UpdateFlags::UPDATE_ALL));
        assert_eq!(level.block_state(pos), state);
    }

    #[test]
    fn test_removal_returns_position_to_air() {
        let (level, stone) = bare_level();
        let pos = BlockPos::new(1, 2, 3);

        level.set_block(pos, level.registry().default_state(stone), UpdateFlags::UPDATE_ALL);
        assert!(level.set_block(pos, Registry::AIR_STATE, UpdateFlags::UPDATE_ALL));
        assert!(level.is_air(pos));
        assert_eq!(level.block_count(), 0);
        // Removing air again is a no-op.
        assert!(!level.set_block(pos, Registry::AIR_STATE, UpdateFlags::UPDATE_ALL));
    }

    #[test]
    fn test_occupancy_tracks_sections() {
        let (level, stone) = bare_level();
        let state = level.registry().default_state(stone);

        level.set_block(BlockPos::new(0, 0, 0), state, UpdateFlags::empty());
        level.set_block(BlockPos::new(1, 5, 1), state, UpdateFlags::empty());
        assert_eq!(level.occupancy.read().len(), 1);

        level.set_block(BlockPos::new(40, 0, 40), state, UpdateFlags::empty());
        assert_eq!(level.occupancy.read().len(), 2);

        level.set_block(BlockPos::new(0, 0, 0), Registry::AIR_STATE, UpdateFlags::empty());
        level.set_block(BlockPos::new(1, 5, 1), Registry::AIR_STATE, UpdateFlags::empty());
        assert_eq!(level.occupancy.read().len(), 1);
    }

    #[test]
    fn test_neighbors_hear_changes_in_canonical_order() {
        let mut registry = Registry::new();
        let stone = registry
            .register(BlockBuilder::new(Identifier::shale("stone")))
            .unwrap();
        let listener = registry
            .register(BlockBuilder::new(Identifier::shale("listener")))
            .unwrap();

        let recorder = Arc::new(RecordingBehavior {
            heard: Mutex::new(Vec::new()),
        });
        let mut behaviors = BehaviorRegistry::new();
        behaviors.set(listener, recorder.clone());

        let level = Level::new(Arc::new(registry), Arc::new(behaviors), quiet());
        let center = BlockPos::new(0, 10, 0);
        let listener_state = level.registry().default_state(listener);
        for direction in Direction::ALL {
            level.set_block(center.relative(direction), listener_state, UpdateFlags::empty());
        }

        level.set_block(center, level.registry().default_state(stone), UpdateFlags::UPDATE_ALL);

        let heard = recorder.heard.lock();
        let expected: Vec<(BlockPos, BlockPos)> = Direction::ALL
            .into_iter()
            .map(|direction| (center.relative(direction), center))
            .collect();
        assert_eq!(*heard, expected);
    }

    #[test]
    fn test_update_flags_gate_the_passes() {
        let mut registry = Registry::new();
        let stone = registry
            .register(BlockBuilder::new(Identifier::shale("stone")))
            .unwrap();
        let listener = registry
            .register(BlockBuilder::new(Identifier::shale("listener")))
            .unwrap();

        let recorder = Arc::new(RecordingBehavior {
            heard: Mutex::new(Vec::new()),
        });
        let mut behaviors = BehaviorRegistry::new();
        behaviors.set(listener, recorder.clone());

        let level = Level::new(Arc::new(registry), Arc::new(behaviors), quiet());
        let center = BlockPos::new(0, 10, 0);
        level.set_block(
            center.relative(Direction::Up),
            level.registry().default_state(listener),
            UpdateFlags::empty(),
        );

        level.set_block(center, level.registry().default_state(stone), UpdateFlags::empty());
        assert!(recorder.heard.lock().is_empty());

        level.set_block(center, Registry::AIR_STATE, UpdateFlags::UPDATE_NEIGHBORS);
        assert_eq!(recorder.heard.lock().len(), 1);
    }

    #[test]
    fn test_incoming_signal_merges_by_max() {
        let mut registry = Registry::new();
        let mut behaviors = BehaviorRegistry::new();
        let mut emitters = Vec::new();
        for (name, strength) in [("em7", 7u8), ("em15", 15), ("em3", 3)] {
            let id = registry
                .register(BlockBuilder::new(Identifier::shale(name)).signal_source())
                .unwrap();
            behaviors.set(id, Arc::new(Emitter { strength }));
            emitters.push(id);
        }

        let level = Level::new(Arc::new(registry), Arc::new(behaviors), quiet());
        let center = BlockPos::new(0, 0, 0);
        // Three emitters and three air sides: 0, 7, 15, 3 merge to 15.
        for (direction, &id) in Direction::HORIZONTAL.iter().zip(emitters.iter()) {
            level.set_block(
                center.relative(*direction),
                level.registry().default_state(id),
                UpdateFlags::empty(),
            );
        }

        assert_eq!(level.incoming_signal(center), 15);
    }

    #[test]
    fn test_depth_valve_truncates_runaway_cascades() {
        let mut registry = Registry::new();
        let runaway = registry
            .register(BlockBuilder::new(Identifier::shale("runaway")))
            .unwrap();
        let mut behaviors = BehaviorRegistry::new();
        behaviors.set(runaway, Arc::new(Runaway { block: runaway }));

        let settings = EngineSettings {
            max_cascade_depth: 8,
            ..quiet()
        };
        let level = Level::new(Arc::new(registry), Arc::new(behaviors), settings);

        level.set_block(
            BlockPos::new(0, 0, 0),
            level.registry().default_state(runaway),
            UpdateFlags::empty(),
        );

        // One placement per depth level, then the valve cuts the branch.
        assert_eq!(level.block_count(), 8);
    }

    #[test]
    fn test_try_set_block_surfaces_the_cutoff() {
        let mut registry = Registry::new();
        let stone = registry
            .register(BlockBuilder::new(Identifier::shale("stone")))
            .unwrap();
        let level = Level::new(
            Arc::new(registry),
            Arc::new(BehaviorRegistry::new()),
            EngineSettings {
                max_cascade_depth: 1,
                ..quiet()
            },
        );

        // Hold the counter at the limit so the next write is denied.
        level.cascade_depth.store(1, Ordering::Relaxed);
        let result = level.try_set_block(
            BlockPos::new(0, 0, 0),
            level.registry().default_state(stone),
            UpdateFlags::empty(),
        );
        assert_eq!(result, Err(CascadeError::DepthExceeded { max_depth: 1 }));
    }

    #[test]
    fn test_replaceable_config_is_exposed() {
        let mut registry = Registry::new();
        let fluid = registry
            .register(
                BlockBuilder::new(Identifier::shale("fluid")).config(BlockConfig {
                    replaceable: true,
                    ..BlockConfig::default()
                }),
            )
            .unwrap();
        let level = Level::new(
            Arc::new(registry),
            Arc::new(BehaviorRegistry::new()),
            quiet(),
        );
        let state = level.registry().default_state(fluid);
        level.set_block(BlockPos::new(0, 0, 0), state, UpdateFlags::empty());
        let block = level.registry().block_of_state(level.block_state(BlockPos::new(0, 0, 0)));
        assert!(block.config.replaceable);
    }
}
