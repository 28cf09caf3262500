//! Interned state layout and the get/set/cycle operations.
//!
//! Each block owns a contiguous range of `BlockStateId`s covering every legal
//! combination of its property values. With properties in registration order
//! and the last property varying fastest, the id of a combination is
//!
//! ```text
//! id = base + sum(value_index(p) * stride(p))
//! ```
//!
//! where a property's stride is the product of the domain sizes of all
//! properties after it. Decoding inverts the same arithmetic, so reading or
//! "modifying" a state never allocates and never touches a lookup table.

use std::borrow::Cow;
use std::fmt::Write;

use shale_utils::BlockStateId;
use thiserror::Error;

use crate::properties::Property;

/// Errors from the fallible state operations.
///
/// The panicking variants of the same operations treat all of these as
/// programmer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The block's definition has no property with the given name.
    #[error("block has no property named `{0}`")]
    UndefinedProperty(&'static str),
    /// A property with the given name exists, but its domain does not match
    /// the property value passed in.
    #[error("property `{0}` was registered with a different domain")]
    DomainMismatch(&'static str),
    /// The value lies outside the property's domain.
    #[error("value {value} is outside the domain of property `{property}`")]
    InvalidValue {
        /// The property name.
        property: &'static str,
        /// The offending value, rendered for the message.
        value: String,
    },
    /// The state id does not belong to the block owning this definition.
    #[error("state {0:?} does not belong to this block")]
    ForeignState(BlockStateId),
}

/// One property slot in a state layout.
#[derive(Debug, Clone)]
pub(crate) struct PropertySlot {
    name: &'static str,
    value_names: Box<[Cow<'static, str>]>,
    stride: u32,
}

impl PropertySlot {
    fn value_count(&self) -> u32 {
        self.value_names.len() as u32
    }
}

/// The state layout of a single block.
#[derive(Debug, Clone)]
pub struct StateDefinition {
    base: u16,
    state_count: u32,
    slots: Box<[PropertySlot]>,
}

impl StateDefinition {
    /// Lays out the state range for the given properties, starting at `base`.
    ///
    /// `properties` holds `(name, value names)` pairs in registration order.
    /// Returns `None` if the combination count would overflow the remaining
    /// id space above `base`.
    pub(crate) fn layout(
        base: u16,
        properties: Vec<(&'static str, Box<[Cow<'static, str>]>)>,
    ) -> Option<Self> {
        let mut slots: Vec<PropertySlot> = properties
            .into_iter()
            .map(|(name, value_names)| PropertySlot {
                name,
                value_names,
                stride: 0,
            })
            .collect();

        // The last property varies fastest: scan strides right to left.
        let mut stride = 1u32;
        for slot in slots.iter_mut().rev() {
            slot.stride = stride;
            stride = stride.checked_mul(slot.value_count())?;
        }

        let state_count = stride;
        if u32::from(base) + state_count > u32::from(u16::MAX) + 1 {
            return None;
        }

        Some(Self {
            base,
            state_count,
            slots: slots.into_boxed_slice(),
        })
    }

    /// The first state id of this block's range.
    #[must_use]
    pub const fn base(&self) -> BlockStateId {
        BlockStateId(self.base)
    }

    /// The number of legal property combinations.
    #[must_use]
    pub const fn state_count(&self) -> u32 {
        self.state_count
    }

    /// The number of properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the state id belongs to this block's range.
    #[must_use]
    pub fn contains(&self, state: BlockStateId) -> bool {
        u32::from(state.0) >= u32::from(self.base)
            && u32::from(state.0) < u32::from(self.base) + self.state_count
    }

    fn slot(&self, name: &str) -> Option<&PropertySlot> {
        // Blocks carry a handful of properties at most; a scan beats hashing.
        self.slots.iter().find(|slot| slot.name == name)
    }

    fn checked_slot<P: Property>(&self, prop: &P) -> Result<&PropertySlot, StateError> {
        let slot = self
            .slot(prop.name())
            .ok_or(StateError::UndefinedProperty(prop.name()))?;
        if slot.value_count() as usize != prop.value_count() {
            return Err(StateError::DomainMismatch(prop.name()));
        }
        Ok(slot)
    }

    fn offset_of(&self, state: BlockStateId) -> Result<u32, StateError> {
        if self.contains(state) {
            Ok(u32::from(state.0 - self.base))
        } else {
            Err(StateError::ForeignState(state))
        }
    }

    /// Reads a property value from a state.
    pub fn try_get_value<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
    ) -> Result<P::Value, StateError> {
        let offset = self.offset_of(state)?;
        let slot = self.checked_slot(prop)?;
        let index = (offset / slot.stride) % slot.value_count();
        Ok(prop.value_at(index as usize))
    }

    /// Reads a property value from a state.
    ///
    /// # Panics
    /// Panics if the property is not part of this block's definition or the
    /// state does not belong to it. Use [`Self::try_get_value`] to probe.
    #[track_caller]
    pub fn get_value<P: Property>(&self, state: BlockStateId, prop: &P) -> P::Value {
        match self.try_get_value(state, prop) {
            Ok(value) => value,
            Err(err) => panic!("get_value: {err}"),
        }
    }

    /// Returns the state with one property changed.
    ///
    /// All other properties keep their values. Setting a property to the
    /// value it already has returns the same id.
    pub fn try_set_value<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
        value: P::Value,
    ) -> Result<BlockStateId, StateError> {
        let offset = self.offset_of(state)?;
        let slot = self.checked_slot(prop)?;
        let value_index = prop
            .value_index(value)
            .ok_or_else(|| StateError::InvalidValue {
                property: prop.name(),
                value: format!("{value:?}"),
            })? as u32;

        let current = (offset / slot.stride) % slot.value_count();
        let rebased = offset - current * slot.stride + value_index * slot.stride;
        Ok(BlockStateId(self.base + rebased as u16))
    }

    /// Returns the state with one property changed.
    ///
    /// # Panics
    /// Panics if the property is not part of this block's definition, the
    /// value lies outside its domain, or the state does not belong to this
    /// block. Use [`Self::try_set_value`] for a fallible version.
    #[track_caller]
    pub fn set_value<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
        value: P::Value,
    ) -> BlockStateId {
        match self.try_set_value(state, prop, value) {
            Ok(next) => next,
            Err(err) => panic!("set_value: {err}"),
        }
    }

    /// Advances a property to its next domain value, wrapping at the end.
    ///
    /// A single-valued property returns the same id.
    pub fn try_cycle<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
    ) -> Result<BlockStateId, StateError> {
        let offset = self.offset_of(state)?;
        let slot = self.checked_slot(prop)?;
        let count = slot.value_count();
        let current = (offset / slot.stride) % count;
        let next = (current + 1) % count;
        let rebased = offset - current * slot.stride + next * slot.stride;
        Ok(BlockStateId(self.base + rebased as u16))
    }

    /// Advances a property to its next domain value, wrapping at the end.
    ///
    /// # Panics
    /// Panics like [`Self::set_value`]. Use [`Self::try_cycle`] to probe.
    #[track_caller]
    pub fn cycle<P: Property>(&self, state: BlockStateId, prop: &P) -> BlockStateId {
        match self.try_cycle(state, prop) {
            Ok(next) => next,
            Err(err) => panic!("cycle: {err}"),
        }
    }

    /// Encodes a state from `(property name, value index)` defaults.
    ///
    /// Properties without a default take the first value of their domain.
    ///
    /// # Panics
    /// Panics if a default names an unknown property or an out-of-range
    /// index; both are registration-time programmer errors.
    pub(crate) fn encode_defaults(&self, defaults: &[(&'static str, u32)]) -> BlockStateId {
        let mut offset = 0u32;
        for &(name, value_index) in defaults {
            let slot = self
                .slot(name)
                .unwrap_or_else(|| panic!("default for unknown property `{name}`"));
            assert!(
                value_index < slot.value_count(),
                "default index {value_index} outside the domain of `{name}`"
            );
            offset += value_index * slot.stride;
        }
        BlockStateId(self.base + offset as u16)
    }

    /// Renders the property assignment of a state, e.g. `[power=3, lit=true]`.
    ///
    /// Returns an empty string for blocks without properties.
    #[must_use]
    pub fn describe(&self, state: BlockStateId) -> String {
        let Ok(offset) = self.offset_of(state) else {
            return format!("[foreign state {}]", state.0);
        };
        if self.slots.is_empty() {
            return String::new();
        }

        let mut out = String::from("[");
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let index = (offset / slot.stride) % slot.value_count();
            let _ = write!(out, "{}={}", slot.name, slot.value_names[index as usize]);
        }
        out.push(']');
        out
    }
}
