//! Engine-wide scheduled tick management.

use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use shale_utils::{BlockPos, SectionPos};

use super::{ChunkTickQueue, ScheduledTick, TickPriority};

/// Manages scheduled ticks across all sections.
///
/// Ticks are stored per section so a whole section's pending ticks can be
/// detached when it is persisted and reattached when it comes back. Sections
/// get their container lazily on first schedule.
///
/// [`Self::drain`] collects every due tick from the active sections into a
/// single ordered batch. Callbacks are the caller's business: the scheduler
/// never runs block behavior itself, so it can live behind a short-held lock.
pub struct TickScheduler<T: Copy + Eq + Hash> {
    /// Per-section tick queues.
    sections: FxHashMap<SectionPos, ChunkTickQueue<T>>,
    /// Earliest trigger tick per section, so drains skip idle sections.
    next_trigger: FxHashMap<SectionPos, i64>,
    /// Monotonic counter breaking ties between same-tick schedules.
    sub_tick_counter: u64,
}

impl<T: Copy + Eq + Hash> TickScheduler<T> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: FxHashMap::default(),
            next_trigger: FxHashMap::default(),
            sub_tick_counter: 0,
        }
    }

    /// Schedules a tick at normal priority, `delay` ticks from `current_tick`.
    pub fn schedule(&mut self, tick_type: T, pos: BlockPos, current_tick: i64, delay: u32) {
        self.schedule_with_priority(tick_type, pos, current_tick, delay, TickPriority::Normal);
    }

    /// Schedules a tick, `delay` ticks from `current_tick`.
    ///
    /// Duplicate schedules for the same position and kind all fire; callers
    /// that want at most one pending tick check [`Self::has_scheduled_tick`]
    /// first.
    pub fn schedule_with_priority(
        &mut self,
        tick_type: T,
        pos: BlockPos,
        current_tick: i64,
        delay: u32,
        priority: TickPriority,
    ) {
        let trigger_tick = current_tick + i64::from(delay);
        let order = self.sub_tick_counter;
        self.sub_tick_counter += 1;

        let section = pos.section();
        self.sections
            .entry(section)
            .or_default()
            .schedule(ScheduledTick::with_priority(
                tick_type,
                pos,
                trigger_tick,
                priority,
                order,
            ));
        self.next_trigger
            .entry(section)
            .and_modify(|earliest| *earliest = (*earliest).min(trigger_tick))
            .or_insert(trigger_tick);
    }

    /// Whether at least one tick is pending for the given position and kind.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, tick_type: T) -> bool {
        self.sections
            .get(&pos.section())
            .is_some_and(|queue| queue.has_scheduled_tick(pos, tick_type))
    }

    /// The number of pending entries for the given position and kind.
    #[must_use]
    pub fn pending_at(&self, pos: BlockPos, tick_type: T) -> u32 {
        self.sections
            .get(&pos.section())
            .map_or(0, |queue| queue.pending_at(pos, tick_type))
    }

    /// The number of pending entries across all sections.
    #[must_use]
    pub fn count(&self) -> usize {
        self.sections.values().map(ChunkTickQueue::count).sum()
    }

    /// Collects every tick due at `current_tick` from sections where
    /// `is_active` holds, globally ordered by trigger tick, priority and
    /// schedule order.
    ///
    /// At most `max_ticks` entries are drained. The cap respects the global
    /// order: section heads are merged through one heap, so a tick fires only
    /// after every earlier due tick has fired, and whatever the cap cuts off
    /// stays queued for the next drain. Inactive sections keep their due
    /// ticks untouched until they become active again.
    pub fn drain<F>(
        &mut self,
        current_tick: i64,
        max_ticks: usize,
        mut is_active: F,
    ) -> Vec<(BlockPos, T)>
    where
        F: FnMut(SectionPos) -> bool,
    {
        let mut due_sections: Vec<SectionPos> = self
            .next_trigger
            .iter()
            .filter(|(section, earliest)| **earliest <= current_tick && is_active(**section))
            .map(|(section, _)| *section)
            .collect();
        due_sections.sort_unstable();

        // One entry per section: a copy of its earliest due tick. Popping
        // yields the globally next tick; the same section then refills its
        // slot with its next due head, if any.
        let mut heads: BinaryHeap<(ScheduledTick<T>, SectionPos)> = BinaryHeap::new();
        for &section in &due_sections {
            if let Some(queue) = self.sections.get(&section)
                && let Some(tick) = queue.peek()
                && tick.trigger_tick <= current_tick
            {
                heads.push((tick.clone(), section));
            }
        }

        let mut fired = Vec::new();
        while fired.len() < max_ticks {
            let Some((_, section)) = heads.pop() else {
                break;
            };
            let Some(queue) = self.sections.get_mut(&section) else {
                continue;
            };
            let Some(tick) = queue.poll_due(current_tick) else {
                continue;
            };
            fired.push((tick.pos, tick.tick_type));
            if let Some(next) = queue.peek()
                && next.trigger_tick <= current_tick
            {
                heads.push((next.clone(), section));
            }
        }

        for section in due_sections {
            match self.sections.get(&section).and_then(ChunkTickQueue::peek) {
                Some(tick) => {
                    self.next_trigger.insert(section, tick.trigger_tick);
                }
                None => {
                    self.next_trigger.remove(&section);
                }
            }
        }
        fired
    }

    /// Attaches a previously detached section queue, merging it with anything
    /// scheduled for that section in the meantime.
    pub fn add_section(&mut self, section: SectionPos, mut saved: ChunkTickQueue<T>) {
        let Self {
            sections,
            next_trigger,
            sub_tick_counter,
        } = self;

        let queue = sections.entry(section).or_default();
        // Reassign schedule order so restored entries stay in their saved
        // relative order but sort after anything already live.
        while let Some(mut tick) = saved.poll() {
            tick.sub_tick_order = *sub_tick_counter;
            *sub_tick_counter += 1;
            queue.schedule(tick);
        }
        if let Some(tick) = queue.peek() {
            let trigger = tick.trigger_tick;
            next_trigger
                .entry(section)
                .and_modify(|earliest| *earliest = (*earliest).min(trigger))
                .or_insert(trigger);
        }
    }

    /// Detaches a section's queue, e.g. to persist it. Returns `None` when
    /// the section never had a tick scheduled.
    pub fn remove_section(&mut self, section: SectionPos) -> Option<ChunkTickQueue<T>> {
        self.next_trigger.remove(&section);
        self.sections.remove(&section)
    }

    /// Removes all pending entries matching the predicate.
    pub fn remove_if<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&ScheduledTick<T>) -> bool,
    {
        let Self {
            sections,
            next_trigger,
            ..
        } = self;
        for (&section, queue) in sections.iter_mut() {
            queue.remove_if(&mut predicate);
            match queue.peek() {
                Some(tick) => {
                    next_trigger.insert(section, tick.trigger_tick);
                }
                None => {
                    next_trigger.remove(&section);
                }
            }
        }
    }
}

impl<T: Copy + Eq + Hash> Default for TickScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
