//! Scheduled tick types.

use std::cmp::Ordering;

use shale_utils::BlockPos;

/// Priority level for scheduled ticks.
///
/// When multiple ticks fire on the same world tick, lower numeric values run
/// first; ties fall back to insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum TickPriority {
    /// The earliest level (-3).
    ExtremelyHigh = -3,
    /// Earlier than high (-2).
    VeryHigh = -2,
    /// Earlier than normal (-1).
    High = -1,
    /// The default level (0).
    #[default]
    Normal = 0,
    /// Later than normal (1).
    Low = 1,
    /// Later than low (2).
    VeryLow = 2,
    /// The latest level (3).
    ExtremelyLow = 3,
}

impl TickPriority {
    /// The numeric level; lower runs first.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }
}

impl PartialOrd for TickPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TickPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that High(-1) > Normal(0) > Low(1) in the max-heap.
        other.value().cmp(&self.value())
    }
}

/// One pending entry of the fixed-delay tier.
///
/// `sub_tick_order` is a level-wide insertion counter; it breaks ties between
/// entries sharing a trigger tick and priority, giving the tier first-in
/// first-out behavior within a tick.
#[derive(Debug, Clone)]
pub struct ScheduledTick<T> {
    /// The block kind this tick was scheduled for.
    pub tick_type: T,
    /// The position the callback will run at.
    pub pos: BlockPos,
    /// The absolute world tick when this entry fires.
    pub trigger_tick: i64,
    /// Ordering within the trigger tick.
    pub priority: TickPriority,
    /// Insertion counter breaking remaining ties. Lower runs first.
    pub sub_tick_order: u64,
}

impl<T> ScheduledTick<T> {
    /// Creates a scheduled tick with normal priority.
    pub fn new(tick_type: T, pos: BlockPos, trigger_tick: i64, sub_tick_order: u64) -> Self {
        Self {
            tick_type,
            pos,
            trigger_tick,
            priority: TickPriority::Normal,
            sub_tick_order,
        }
    }

    /// Creates a scheduled tick with the given priority.
    pub fn with_priority(
        tick_type: T,
        pos: BlockPos,
        trigger_tick: i64,
        priority: TickPriority,
        sub_tick_order: u64,
    ) -> Self {
        Self {
            tick_type,
            pos,
            trigger_tick,
            priority,
            sub_tick_order,
        }
    }
}

impl<T> PartialEq for ScheduledTick<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trigger_tick == other.trigger_tick
            && self.priority == other.priority
            && self.sub_tick_order == other.sub_tick_order
    }
}

impl<T> Eq for ScheduledTick<T> {}

impl<T> PartialOrd for ScheduledTick<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTick<T> {
    /// Comparison used by the tick heap.
    ///
    /// `BinaryHeap` is a max-heap, so trigger ticks and insertion order
    /// compare reversed to pop the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .trigger_tick
            .cmp(&self.trigger_tick)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| other.sub_tick_order.cmp(&self.sub_tick_order))
    }
}

/// The `(position, kind)` occupancy key of an entry.
///
/// The queue counts entries per key so `has_scheduled_tick` answers without
/// walking the heap. Timing is deliberately excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickKey<T> {
    /// The position of the entry.
    pub pos: BlockPos,
    /// The block kind of the entry.
    pub tick_type: T,
}

impl<T: Copy> From<&ScheduledTick<T>> for TickKey<T> {
    fn from(tick: &ScheduledTick<T>) -> Self {
        Self {
            pos: tick.pos,
            tick_type: tick.tick_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_pops_by_trigger_then_priority_then_insertion() {
        let pos = BlockPos::new(2, 0, 2);

        // In a max-heap the entry that must pop first compares greatest.
        let sooner = ScheduledTick::new(0u32, pos, 8, 0);
        let later = ScheduledTick::new(0u32, pos, 12, 0);
        assert!(sooner > later);

        // A tie on the trigger falls through to the priority level.
        let urgent = ScheduledTick::with_priority(0u32, pos, 8, TickPriority::VeryHigh, 1);
        assert!(urgent > sooner);

        // A full tie resolves by insertion counter.
        let first_in = ScheduledTick::new(0u32, pos, 8, 3);
        let second_in = ScheduledTick::new(0u32, pos, 8, 4);
        assert!(first_in > second_in);
    }

    #[test]
    fn test_priority_scale() {
        assert_eq!(TickPriority::ExtremelyHigh.value(), -3);
        assert_eq!(TickPriority::Normal.value(), 0);
        assert_eq!(TickPriority::ExtremelyLow.value(), 3);
        assert_eq!(TickPriority::default(), TickPriority::Normal);
        assert!(TickPriority::High > TickPriority::Low);
    }
}
