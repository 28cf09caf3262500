//! The reference world backing the engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use shale_registry::Registry;
use shale_utils::random::Xoroshiro;
use shale_utils::{BlockId, BlockPos, BlockStateId, SectionPos};

use crate::behavior::BehaviorRegistry;
use crate::settings::EngineSettings;
use crate::ticks::{ChunkTickQueue, RandomTickSampler, TickPriority, TickScheduler};

/// A world: sparse block storage plus the machinery that ticks it.
///
/// Positions never written to hold air. All interior mutability sits behind
/// short-held locks, and no lock is held while a behavior hook runs, so
/// hooks may freely read and mutate the level they were called from.
pub struct Level {
    registry: Arc<Registry>,
    behaviors: Arc<BehaviorRegistry>,
    settings: EngineSettings,
    /// Sparse block storage. Absent means air.
    pub(crate) blocks: RwLock<FxHashMap<BlockPos, BlockStateId>>,
    /// Non-air block count per section. Sections with an entry are active.
    pub(crate) occupancy: RwLock<FxHashMap<SectionPos, u32>>,
    scheduler: Mutex<TickScheduler<BlockId>>,
    game_time: AtomicI64,
    /// Root random stream; hooks get short-lived forks of it.
    random: Mutex<Xoroshiro>,
    sampler: RandomTickSampler,
    /// Nesting depth of the running update cascade.
    pub(crate) cascade_depth: AtomicUsize,
}

impl Level {
    /// Creates a level over the given block set and behavior table.
    #[must_use]
    pub fn new(
        registry: Arc<Registry>,
        behaviors: Arc<BehaviorRegistry>,
        settings: EngineSettings,
    ) -> Self {
        let mut root = Xoroshiro::from_seed(settings.seed as u64);
        let sampler = RandomTickSampler::with_factory(root.fork_positional());
        Self {
            registry,
            behaviors,
            settings,
            blocks: RwLock::new(FxHashMap::default()),
            occupancy: RwLock::new(FxHashMap::default()),
            scheduler: Mutex::new(TickScheduler::new()),
            game_time: AtomicI64::new(0),
            random: Mutex::new(root),
            sampler,
            cascade_depth: AtomicUsize::new(0),
        }
    }

    /// The block registry this level was built over.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The behavior table this level dispatches into.
    #[must_use]
    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    /// The settings this level runs with.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The number of world ticks run so far.
    #[must_use]
    pub fn game_time(&self) -> i64 {
        self.game_time.load(Ordering::Relaxed)
    }

    /// The state at `pos`.
    #[must_use]
    pub fn block_state(&self, pos: BlockPos) -> BlockStateId {
        self.blocks
            .read()
            .get(&pos)
            .copied()
            .unwrap_or(Registry::AIR_STATE)
    }

    /// The block kind at `pos`.
    #[must_use]
    pub fn block_at(&self, pos: BlockPos) -> BlockId {
        self.registry.block_of_state(self.block_state(pos)).id()
    }

    /// Whether `pos` holds air.
    #[must_use]
    pub fn is_air(&self, pos: BlockPos) -> bool {
        self.registry.is_air(self.block_state(pos))
    }

    /// The number of non-air blocks stored.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.read().len()
    }

    /// Schedules a tick for `block` at `pos`, firing `delay` world ticks
    /// from now at normal priority.
    pub fn schedule_tick(&self, pos: BlockPos, block: BlockId, delay: u32) {
        self.schedule_tick_with_priority(pos, block, delay, TickPriority::Normal);
    }

    /// Schedules a tick with an explicit priority.
    pub fn schedule_tick_with_priority(
        &self,
        pos: BlockPos,
        block: BlockId,
        delay: u32,
        priority: TickPriority,
    ) {
        let current_tick = self.game_time();
        self.scheduler
            .lock()
            .schedule_with_priority(block, pos, current_tick, delay, priority);
    }

    /// Whether a tick is already pending for `block` at `pos`.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, block: BlockId) -> bool {
        self.scheduler.lock().has_scheduled_tick(pos, block)
    }

    /// The number of pending scheduled ticks across the level.
    #[must_use]
    pub fn pending_tick_count(&self) -> usize {
        self.scheduler.lock().count()
    }

    /// Detaches a section's pending ticks, e.g. to persist them.
    pub fn detach_section_ticks(&self, section: SectionPos) -> Option<ChunkTickQueue<BlockId>> {
        self.scheduler.lock().remove_section(section)
    }

    /// Reattaches previously detached section ticks.
    pub fn attach_section_ticks(&self, section: SectionPos, ticks: ChunkTickQueue<BlockId>) {
        self.scheduler.lock().add_section(section, ticks);
    }

    /// Runs one world tick: advances game time, fires due scheduled ticks,
    /// then runs the random tick sweep.
    ///
    /// A fired entry whose position no longer holds the block it was
    /// scheduled for is dropped without effect; scheduling a tick and then
    /// replacing the block is normal churn, not an error.
    pub fn tick(&self) {
        let current_tick = self.game_time.fetch_add(1, Ordering::Relaxed) + 1;

        let active: FxHashSet<SectionPos> = self.occupancy.read().keys().copied().collect();
        let fired = {
            let mut scheduler = self.scheduler.lock();
            scheduler.drain(
                current_tick,
                self.settings.max_ticks_per_drain as usize,
                |section| active.contains(&section),
            )
        };

        for (pos, block_id) in fired {
            let state = self.block_state(pos);
            let current = self.registry.block_of_state(state);
            if current.id() != block_id {
                log::trace!(
                    "dropping stale tick for {} at {pos}, found {}",
                    self.registry.block(block_id).name(),
                    current.name()
                );
                continue;
            }
            let mut random = self.random.lock().fork();
            self.behaviors
                .get(block_id)
                .scheduled_tick(state, self, pos, &mut random);
        }

        self.run_random_ticks(current_tick);
    }

    /// Samples every stored position against the random tick chance and
    /// fires `random_tick` for the winners.
    fn run_random_ticks(&self, current_tick: i64) {
        let speed = self.settings.random_tick_speed;
        if speed == 0 {
            return;
        }

        let winners: Vec<BlockPos> = {
            let blocks = self.blocks.read();
            blocks
                .iter()
                .filter_map(|(&pos, &state)| {
                    let block = self.registry.block_of_state(state);
                    let eligible = block.config.random_ticks
                        && self
                            .behaviors
                            .get(block.id())
                            .is_randomly_ticking(&self.registry, state);
                    (eligible && self.sampler.should_tick(pos, current_tick, speed))
                        .then_some(pos)
                })
                .collect()
        };

        for pos in winners {
            // Re-read and re-check: an earlier winner's callback may have
            // changed this position, including to a same-kind state that no
            // longer ticks.
            let state = self.block_state(pos);
            let block = self.registry.block_of_state(state);
            let behavior = self.behaviors.get(block.id());
            if !block.config.random_ticks {
                continue;
            }
            if !behavior.is_randomly_ticking(&self.registry, state) {
                continue;
            }
            let mut random = self.random.lock().fork();
            behavior.random_tick(state, self, pos, &mut random);
        }
    }
}
