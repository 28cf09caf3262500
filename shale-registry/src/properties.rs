//! Typed state properties.
//!
//! A property names one axis of a block's state space and enumerates its
//! domain in a fixed order. The order matters: it decides how property values
//! map onto interned state ids, and it is the order `cycle` walks through.

use std::borrow::Cow;
use std::fmt::Debug;
use std::marker::PhantomData;

/// An enum usable as the domain of an [`EnumProperty`].
///
/// `'static` is required so the variant table can live in a const.
pub trait PropertyEnum: Copy + Eq + Debug + 'static {
    /// Every variant, in domain order.
    const VALUES: &'static [Self];

    /// A short lowercase name for the variant.
    fn name(self) -> &'static str;

    /// The variant's position in [`Self::VALUES`].
    fn index(self) -> usize;
}

/// One axis of a block's state space.
pub trait Property {
    /// The value type this property stores.
    type Value: Copy + Eq + Debug;

    /// The property name, unique within one block.
    fn name(&self) -> &'static str;

    /// The number of values in the domain.
    fn value_count(&self) -> usize;

    /// The position of `value` in the domain, or `None` if it lies outside.
    fn value_index(&self, value: Self::Value) -> Option<usize>;

    /// The value at `index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the domain.
    fn value_at(&self, index: usize) -> Self::Value;

    /// The serialized name of the value at `index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the domain.
    fn value_name(&self, index: usize) -> Cow<'static, str>;
}

/// A two-valued property. The domain order is `true`, `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolProperty {
    /// The property name.
    pub name: &'static str,
}

impl BoolProperty {
    /// Creates a bool property.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Property for BoolProperty {
    type Value = bool;

    fn name(&self) -> &'static str {
        self.name
    }

    fn value_count(&self) -> usize {
        2
    }

    fn value_index(&self, value: bool) -> Option<usize> {
        Some(usize::from(!value))
    }

    fn value_at(&self, index: usize) -> bool {
        match index {
            0 => true,
            1 => false,
            _ => panic!("index {index} outside bool domain"),
        }
    }

    fn value_name(&self, index: usize) -> Cow<'static, str> {
        Cow::Borrowed(if self.value_at(index) { "true" } else { "false" })
    }
}

/// A contiguous integer property with inclusive bounds.
///
/// The bounds are public so callers can clamp or enumerate without going
/// through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntProperty {
    /// The property name.
    pub name: &'static str,
    /// The smallest legal value.
    pub min: u8,
    /// The largest legal value.
    pub max: u8,
}

impl IntProperty {
    /// Creates an integer property over `min..=max`.
    ///
    /// # Panics
    /// Panics if `min > max`.
    #[must_use]
    pub const fn new(name: &'static str, min: u8, max: u8) -> Self {
        assert!(min <= max, "empty integer property domain");
        Self { name, min, max }
    }
}

impl Property for IntProperty {
    type Value = u8;

    fn name(&self) -> &'static str {
        self.name
    }

    fn value_count(&self) -> usize {
        usize::from(self.max - self.min) + 1
    }

    fn value_index(&self, value: u8) -> Option<usize> {
        (self.min..=self.max)
            .contains(&value)
            .then(|| usize::from(value - self.min))
    }

    fn value_at(&self, index: usize) -> u8 {
        assert!(index < self.value_count(), "index {index} outside domain");
        self.min + index as u8
    }

    fn value_name(&self, index: usize) -> Cow<'static, str> {
        Cow::Owned(self.value_at(index).to_string())
    }
}

/// A property over a closed enum domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumProperty<T: PropertyEnum> {
    /// The property name.
    pub name: &'static str,
    _marker: PhantomData<T>,
}

impl<T: PropertyEnum> EnumProperty<T> {
    /// Creates an enum property.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

impl<T: PropertyEnum> Property for EnumProperty<T> {
    type Value = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn value_count(&self) -> usize {
        T::VALUES.len()
    }

    fn value_index(&self, value: T) -> Option<usize> {
        let index = value.index();
        (index < T::VALUES.len() && T::VALUES[index] == value).then_some(index)
    }

    fn value_at(&self, index: usize) -> T {
        T::VALUES[index]
    }

    fn value_name(&self, index: usize) -> Cow<'static, str> {
        Cow::Borrowed(T::VALUES[index].name())
    }
}
