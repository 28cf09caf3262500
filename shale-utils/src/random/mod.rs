//! Deterministic random sources.
//!
//! The engine never draws from ambient process randomness. Every consumer is
//! handed a seedable source so that whole runs replay exactly, and positional
//! factories derive independent streams per grid cell.

pub mod xoroshiro;

pub use xoroshiro::{PositionalRandomFactory, Xoroshiro};

/// Sampling surface shared by all random sources.
///
/// Object safe so behavior callbacks can take `&mut dyn RandomSource`.
/// Forking lives on the concrete types.
pub trait RandomSource {
    /// Returns the next 64 random bits.
    fn next_u64(&mut self) -> u64;

    /// Returns a uniformly distributed `i32`.
    fn next_i32(&mut self) -> i32;

    /// Returns a uniform value in `0..bound`.
    ///
    /// # Panics
    /// Panics if `bound` is not positive.
    fn next_i32_bounded(&mut self, bound: i32) -> i32;

    /// Returns a uniform `f32` in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Returns a uniform `f64` in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed bool.
    fn next_bool(&mut self) -> bool;
}

/// Hashes a grid position into a seed contribution.
///
/// Coordinates that differ in any single component produce well-spread
/// seeds, which keeps per-position streams independent.
#[must_use]
pub fn get_seed(x: i32, y: i32, z: i32) -> i64 {
    let l = (i64::from(x).wrapping_mul(3_129_871))
        ^ i64::from(z).wrapping_mul(116_129_781)
        ^ i64::from(y);
    let l = l
        .wrapping_mul(l)
        .wrapping_mul(42_317_861)
        .wrapping_add(l.wrapping_mul(11));
    l >> 16
}

/// Stafford variant 13 finalization mix.
#[must_use]
pub fn mix_stafford_13(z: u64) -> u64 {
    let z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    let z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
