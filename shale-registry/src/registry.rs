//! The block registry.
//!
//! An explicit registry value owns every block descriptor and the dense
//! state-to-block table. Nothing here is a global: components that resolve
//! ids are handed a `&Registry` (usually through an `Arc`), which keeps
//! multiple independent registries possible and makes tests hermetic.

use std::iter::repeat_n;

use rustc_hash::FxHashMap;
use shale_utils::{BlockId, BlockStateId, Identifier};
use thiserror::Error;

use crate::block::{Block, BlockBuilder, BlockConfig};
use crate::properties::Property;
use crate::state::{StateDefinition, StateError};

/// Errors surfaced during block registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A block with the same name is already registered.
    #[error("block `{0}` is already registered")]
    DuplicateBlock(Identifier),
    /// The 16 bit block id space is used up.
    #[error("no block ids left")]
    BlockSpaceExhausted,
    /// The 16 bit state id space cannot hold the block's combinations.
    #[error("state space exhausted while registering `{block}`")]
    StateSpaceExhausted {
        /// The block whose registration failed.
        block: Identifier,
    },
}

/// Owns all block descriptors and the state ownership table.
///
/// The air block is registered by the constructor and is always
/// [`Registry::AIR`] with the single state [`Registry::AIR_STATE`].
pub struct Registry {
    blocks: Vec<Block>,
    by_name: FxHashMap<Identifier, BlockId>,
    state_owner: Vec<BlockId>,
}

impl Registry {
    /// The id of the built-in air block.
    pub const AIR: BlockId = BlockId(0);
    /// The single state of the built-in air block.
    pub const AIR_STATE: BlockStateId = BlockStateId(0);

    /// Creates a registry holding only the built-in air block.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            blocks: Vec::new(),
            by_name: FxHashMap::default(),
            state_owner: Vec::new(),
        };
        registry.register_air();
        registry
    }

    /// Air is laid out by hand so that the public registration path never
    /// runs against an empty registry.
    fn register_air(&mut self) {
        let name = Identifier::shale("air");
        let definition = match StateDefinition::layout(0, Vec::new()) {
            Some(definition) => definition,
            None => unreachable!("air always fits at the start of the id space"),
        };
        let config = BlockConfig {
            replaceable: true,
            air: true,
            ..BlockConfig::default()
        };
        let block = Block::new(Self::AIR, name.clone(), definition, Self::AIR_STATE, config);
        self.by_name.insert(name, Self::AIR);
        self.state_owner.push(Self::AIR);
        self.blocks.push(block);
    }

    /// Registers a block and lays out its state range.
    pub fn register(&mut self, builder: BlockBuilder) -> Result<BlockId, RegistryError> {
        if self.by_name.contains_key(&builder.name) {
            return Err(RegistryError::DuplicateBlock(builder.name));
        }

        let Ok(raw_id) = u16::try_from(self.blocks.len()) else {
            return Err(RegistryError::BlockSpaceExhausted);
        };
        let id = BlockId(raw_id);

        // A full table means the next base itself no longer fits in a u16.
        let Ok(base) = u16::try_from(self.state_owner.len()) else {
            return Err(RegistryError::StateSpaceExhausted {
                block: builder.name,
            });
        };
        let Some(definition) = StateDefinition::layout(base, builder.properties) else {
            return Err(RegistryError::StateSpaceExhausted {
                block: builder.name,
            });
        };

        let default_state = definition.encode_defaults(&builder.defaults);
        let state_count = definition.state_count();

        log::debug!(
            "Registered block {} with {state_count} state(s) at base {base}",
            builder.name
        );

        self.by_name.insert(builder.name.clone(), id);
        self.blocks.push(Block::new(
            id,
            builder.name,
            definition,
            default_state,
            builder.config,
        ));
        self.state_owner.extend(repeat_n(id, state_count as usize));

        Ok(id)
    }

    /// Looks up a block descriptor by id.
    ///
    /// # Panics
    /// Panics if the id was not issued by this registry.
    #[must_use]
    #[track_caller]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    /// Looks up the block owning a state id.
    ///
    /// # Panics
    /// Panics if the state id was not issued by this registry.
    #[must_use]
    #[track_caller]
    pub fn block_of_state(&self, state: BlockStateId) -> &Block {
        let id = self.state_owner[state.0 as usize];
        &self.blocks[id.0 as usize]
    }

    /// Resolves a block id from its registered name.
    #[must_use]
    pub fn by_name(&self, name: &Identifier) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Whether the state belongs to the air block.
    #[must_use]
    pub fn is_air(&self, state: BlockStateId) -> bool {
        self.block_of_state(state).config.air
    }

    /// The default state of a block.
    #[must_use]
    pub fn default_state(&self, id: BlockId) -> BlockStateId {
        self.block(id).default_state()
    }

    /// The number of registered blocks, including air.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The number of issued state ids, including air's.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.state_owner.len()
    }

    /// Reads a property value from a state.
    ///
    /// # Panics
    /// Panics if the owning block has no such property. Programmer error;
    /// use [`Self::try_get_value`] to probe states of unknown blocks.
    #[track_caller]
    pub fn get_value<P: Property>(&self, state: BlockStateId, prop: &P) -> P::Value {
        self.block_of_state(state).state_definition().get_value(state, prop)
    }

    /// Reads a property value, returning an error for foreign properties.
    pub fn try_get_value<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
    ) -> Result<P::Value, StateError> {
        self.block_of_state(state)
            .state_definition()
            .try_get_value(state, prop)
    }

    /// Returns the state with one property changed.
    ///
    /// # Panics
    /// Panics if the owning block has no such property or the value is out
    /// of domain. Use [`Self::try_set_value`] for a fallible version.
    #[track_caller]
    pub fn set_value<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
        value: P::Value,
    ) -> BlockStateId {
        self.block_of_state(state)
            .state_definition()
            .set_value(state, prop, value)
    }

    /// Returns the state with one property changed, or an error.
    pub fn try_set_value<P: Property>(
        &self,
        state: BlockStateId,
        prop: &P,
        value: P::Value,
    ) -> Result<BlockStateId, StateError> {
        self.block_of_state(state)
            .state_definition()
            .try_set_value(state, prop, value)
    }

    /// Advances a property to its next domain value, wrapping at the end.
    ///
    /// # Panics
    /// Panics if the owning block has no such property.
    #[track_caller]
    pub fn cycle<P: Property>(&self, state: BlockStateId, prop: &P) -> BlockStateId {
        self.block_of_state(state).state_definition().cycle(state, prop)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
