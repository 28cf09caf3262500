//! Two component vector.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A two component vector.
///
/// Ordering is lexicographic by component; it exists so positions built on
/// this type can key ordered collections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Vector2<T> {
    /// The x component.
    pub x: T,
    /// The y component.
    pub y: T,
}

impl<T> Vector2<T> {
    /// Creates a new vector from its components.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Add<Output = T>> Add for Vector2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Vector2<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
