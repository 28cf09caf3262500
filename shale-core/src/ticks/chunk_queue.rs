//! Per-section scheduled tick storage.

use std::collections::BinaryHeap;
use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashMap;
use shale_utils::BlockPos;

use super::{ScheduledTick, TickKey};

/// Per-section storage for scheduled ticks.
///
/// A priority queue ordered by trigger tick, priority and insertion order,
/// plus an occupancy count per `(position, kind)` key.
///
/// Duplicate schedules are kept, not coalesced: scheduling the same position
/// and kind twice enqueues two entries and the callback fires twice. Blocks
/// that want at-most-one pending tick check [`Self::has_scheduled_tick`]
/// before scheduling.
pub struct ChunkTickQueue<T: Copy + Eq + Hash> {
    /// Heap of pending ticks, soonest trigger first.
    tick_queue: BinaryHeap<ScheduledTick<T>>,
    /// Number of pending entries per (pos, kind) key.
    occupancy: FxHashMap<TickKey<T>, u32>,
}

impl<T: Copy + Eq + Hash> ChunkTickQueue<T> {
    /// Creates an empty section queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_queue: BinaryHeap::new(),
            occupancy: FxHashMap::default(),
        }
    }

    /// Enqueues a tick. Duplicates are kept and all of them fire.
    pub fn schedule(&mut self, tick: ScheduledTick<T>) {
        *self.occupancy.entry(TickKey::from(&tick)).or_insert(0) += 1;
        self.tick_queue.push(tick);
    }

    /// Returns the next tick to fire without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ScheduledTick<T>> {
        self.tick_queue.peek()
    }

    /// Pops the tick at the head of the queue.
    pub fn poll(&mut self) -> Option<ScheduledTick<T>> {
        let tick = self.tick_queue.pop()?;
        self.release(&TickKey::from(&tick));
        Some(tick)
    }

    /// Removes and returns the next tick, but only if it is due at
    /// `current_tick`.
    pub fn poll_due(&mut self, current_tick: i64) -> Option<ScheduledTick<T>> {
        if self.peek()?.trigger_tick <= current_tick {
            self.poll()
        } else {
            None
        }
    }

    fn release(&mut self, key: &TickKey<T>) {
        if let Some(count) = self.occupancy.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.occupancy.remove(key);
            }
        }
    }

    /// Whether at least one tick is pending for the given position and kind.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, tick_type: T) -> bool {
        self.occupancy.contains_key(&TickKey { pos, tick_type })
    }

    /// The number of pending entries for the given position and kind.
    #[must_use]
    pub fn pending_at(&self, pos: BlockPos, tick_type: T) -> u32 {
        self.occupancy
            .get(&TickKey { pos, tick_type })
            .copied()
            .unwrap_or(0)
    }

    /// The number of pending entries in this section.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tick_queue.len()
    }

    /// Whether no ticks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tick_queue.is_empty()
    }

    /// Removes all entries matching the predicate.
    pub fn remove_if<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&ScheduledTick<T>) -> bool,
    {
        let (dropped, kept): (Vec<_>, Vec<_>) = mem::take(&mut self.tick_queue)
            .into_iter()
            .partition(|tick| predicate(tick));
        for tick in &dropped {
            self.release(&TickKey::from(tick));
        }
        self.tick_queue = kept.into();
    }

    /// Iterates over all pending entries in no particular order.
    ///
    /// Used to copy or persist a section's ticks wholesale.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTick<T>> {
        self.tick_queue.iter()
    }
}

impl<T: Copy + Eq + Hash> Default for ChunkTickQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;
    use crate::ticks::TickPriority;

    #[test]
    fn test_poll_clears_occupancy() {
        let mut ticks: ChunkTickQueue<u32> = ChunkTickQueue::new();
        let pos = BlockPos::new(3, 12, -4);

        ticks.schedule(ScheduledTick::new(7, pos, 40, 0));
        assert_eq!(ticks.count(), 1);
        assert!(ticks.has_scheduled_tick(pos, 7));
        assert!(!ticks.has_scheduled_tick(pos, 8));

        let polled = ticks.poll().expect("queued tick");
        assert_eq!(polled.trigger_tick, 40);
        assert!(ticks.is_empty());
        assert!(!ticks.has_scheduled_tick(pos, 7));
    }

    #[test]
    fn test_duplicates_both_fire() {
        let mut ticks: ChunkTickQueue<u32> = ChunkTickQueue::new();
        let pos = BlockPos::new(-5, 80, 5);

        // Same (pos, kind) twice with different timings: both entries stay.
        ticks.schedule(ScheduledTick::new(1, pos, 30, 0));
        ticks.schedule(ScheduledTick::new(1, pos, 60, 1));
        assert_eq!(ticks.count(), 2);
        assert_eq!(ticks.pending_at(pos, 1), 2);

        assert_eq!(ticks.poll().expect("earlier copy").trigger_tick, 30);
        assert!(ticks.has_scheduled_tick(pos, 1));
        assert_eq!(ticks.pending_at(pos, 1), 1);

        assert_eq!(ticks.poll().expect("later copy").trigger_tick, 60);
        assert!(!ticks.has_scheduled_tick(pos, 1));
    }

    #[test]
    fn test_poll_due_respects_trigger_tick() {
        let mut ticks: ChunkTickQueue<u32> = ChunkTickQueue::new();
        let pos = BlockPos::new(0, 0, 0);

        ticks.schedule(ScheduledTick::new(1, pos, 100, 0));

        assert!(ticks.poll_due(99).is_none());
        assert_eq!(ticks.count(), 1);
        assert!(ticks.poll_due(100).is_some());
        assert!(ticks.poll_due(100).is_none());
    }

    #[test]
    fn test_polls_in_trigger_order() {
        let mut ticks: ChunkTickQueue<u32> = ChunkTickQueue::new();

        for (kind, z, trigger) in [(4, 0, 9), (5, 1, 5), (6, 2, 7)] {
            ticks.schedule(ScheduledTick::new(kind, BlockPos::new(0, 0, z), trigger, z as u64));
        }

        let order: Vec<i64> = iter::from_fn(|| ticks.poll())
            .map(|tick| tick.trigger_tick)
            .collect();
        assert_eq!(order, vec![5, 7, 9]);
    }

    #[test]
    fn test_priority_breaks_trigger_ties() {
        let mut ticks: ChunkTickQueue<u32> = ChunkTickQueue::new();
        let scheduled = [TickPriority::Normal, TickPriority::Low, TickPriority::High];

        for (i, priority) in scheduled.into_iter().enumerate() {
            ticks.schedule(ScheduledTick::with_priority(
                0,
                BlockPos::new(i as i32, 4, 0),
                64,
                priority,
                i as u64,
            ));
        }

        let order: Vec<TickPriority> = iter::from_fn(|| ticks.poll())
            .map(|tick| tick.priority)
            .collect();
        assert_eq!(
            order,
            vec![TickPriority::High, TickPriority::Normal, TickPriority::Low]
        );
    }

    #[test]
    fn test_remove_if() {
        let mut ticks: ChunkTickQueue<u32> = ChunkTickQueue::new();
        let keep = BlockPos::new(0, 0, 0);
        let drop = BlockPos::new(9, 0, 9);

        ticks.schedule(ScheduledTick::new(1, keep, 100, 0));
        ticks.schedule(ScheduledTick::new(1, drop, 100, 1));
        ticks.schedule(ScheduledTick::new(1, drop, 150, 2));

        ticks.remove_if(|tick| tick.pos == drop);

        assert_eq!(ticks.count(), 1);
        assert!(ticks.has_scheduled_tick(keep, 1));
        assert!(!ticks.has_scheduled_tick(drop, 1));
    }
}
