//! Probabilistic random tick sampling.

use shale_utils::BlockPos;
use shale_utils::random::{
    PositionalRandomFactory, RandomSource, Xoroshiro, get_seed, mix_stafford_13,
};

/// Sample space for the random tick draw. A tick speed of `n` gives each
/// position an `n / 4096` chance per game tick.
pub const RANDOM_TICK_SAMPLE_SPACE: u32 = 4096;

/// Draws the per-position random tick lottery.
///
/// Each `(position, game time)` pair gets its own short-lived stream derived
/// from the sampler seed, so outcomes never depend on the order positions are
/// visited in and whole runs replay exactly from the seed.
pub struct RandomTickSampler {
    factory: PositionalRandomFactory,
}

impl RandomTickSampler {
    /// Creates a sampler for the given engine seed.
    #[must_use]
    pub fn new(seed: i64) -> Self {
        let mut source = Xoroshiro::from_seed(seed as u64);
        Self::with_factory(source.fork_positional())
    }

    /// Creates a sampler drawing from an already-forked factory.
    #[must_use]
    pub fn with_factory(factory: PositionalRandomFactory) -> Self {
        Self { factory }
    }

    /// Whether `pos` wins the random tick draw at `game_time`.
    ///
    /// `speed` is clamped to [`RANDOM_TICK_SAMPLE_SPACE`]; zero disables the
    /// tier entirely.
    #[must_use]
    pub fn should_tick(&self, pos: BlockPos, game_time: i64, speed: u32) -> bool {
        if speed == 0 {
            return false;
        }
        let speed = speed.min(RANDOM_TICK_SAMPLE_SPACE);
        let hash =
            (get_seed(pos.x(), pos.y(), pos.z()) as u64) ^ mix_stafford_13(game_time as u64);
        let mut random = self.factory.at_hash(hash);
        (random.next_i32_bounded(RANDOM_TICK_SAMPLE_SPACE as i32) as u32) < speed
    }
}
