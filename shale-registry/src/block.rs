//! Block descriptors and the registration builder.

use std::borrow::Cow;

use shale_utils::{BlockId, BlockStateId, Identifier};

use crate::properties::Property;
use crate::state::StateDefinition;

/// Flat capability record for a block kind.
///
/// Behaviors branch on these flags instead of downcasting, so adding a
/// capability means adding a field here rather than a type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockConfig {
    /// Whether states of this block take part in random tick sampling.
    pub random_ticks: bool,
    /// Whether this block emits a signal of its own.
    pub signal_source: bool,
    /// Whether this block carries incoming signal onwards (at a loss of one).
    pub conductive: bool,
    /// Whether placements may overwrite this block without breaking it first.
    pub replaceable: bool,
    /// Whether this block counts as empty space.
    pub air: bool,
}

/// An immutable block descriptor.
pub struct Block {
    id: BlockId,
    name: Identifier,
    definition: StateDefinition,
    default_state: BlockStateId,
    /// The block's capability record.
    pub config: BlockConfig,
}

impl Block {
    pub(crate) fn new(
        id: BlockId,
        name: Identifier,
        definition: StateDefinition,
        default_state: BlockStateId,
        config: BlockConfig,
    ) -> Self {
        Self {
            id,
            name,
            definition,
            default_state,
            config,
        }
    }

    /// The block's dense id.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// The block's registered name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// The block's state layout.
    #[must_use]
    pub const fn state_definition(&self) -> &StateDefinition {
        &self.definition
    }

    /// The state new placements start from.
    #[must_use]
    pub const fn default_state(&self) -> BlockStateId {
        self.default_state
    }

    /// Renders `name[prop=value, ...]` for logs and errors.
    #[must_use]
    pub fn describe_state(&self, state: BlockStateId) -> String {
        format!("{}{}", self.name, self.definition.describe(state))
    }
}

/// Collects everything needed to register a block.
pub struct BlockBuilder {
    pub(crate) name: Identifier,
    pub(crate) properties: Vec<(&'static str, Box<[Cow<'static, str>]>)>,
    pub(crate) defaults: Vec<(&'static str, u32)>,
    pub(crate) config: BlockConfig,
}

impl BlockBuilder {
    /// Starts a builder for a block with the given name.
    #[must_use]
    pub fn new(name: Identifier) -> Self {
        Self {
            name,
            properties: Vec::new(),
            defaults: Vec::new(),
            config: BlockConfig::default(),
        }
    }

    /// Adds a state property. Registration order fixes the state layout.
    ///
    /// # Panics
    /// Panics if a property with the same name was already added.
    #[must_use]
    pub fn property<P: Property>(mut self, prop: &P) -> Self {
        assert!(
            self.properties.iter().all(|(name, _)| *name != prop.name()),
            "duplicate property `{}` on block {}",
            prop.name(),
            self.name
        );
        let value_names: Box<[Cow<'static, str>]> = (0..prop.value_count())
            .map(|index| prop.value_name(index))
            .collect();
        self.properties.push((prop.name(), value_names));
        self
    }

    /// Overrides the default value of a property.
    ///
    /// Properties without an override default to the first value of their
    /// domain.
    ///
    /// # Panics
    /// Panics if the value lies outside the property's domain.
    #[must_use]
    pub fn default_value<P: Property>(mut self, prop: &P, value: P::Value) -> Self {
        let index = prop.value_index(value).unwrap_or_else(|| {
            panic!(
                "default {value:?} is outside the domain of `{}`",
                prop.name()
            )
        });
        self.defaults.push((prop.name(), index as u32));
        self
    }

    /// Replaces the whole capability record.
    #[must_use]
    pub fn config(mut self, config: BlockConfig) -> Self {
        self.config = config;
        self
    }

    /// Marks states of this block for random tick sampling.
    #[must_use]
    pub fn random_ticks(mut self) -> Self {
        self.config.random_ticks = true;
        self
    }

    /// Marks this block as a signal emitter.
    #[must_use]
    pub fn signal_source(mut self) -> Self {
        self.config.signal_source = true;
        self
    }

    /// Marks this block as carrying signal onwards.
    #[must_use]
    pub fn conductive(mut self) -> Self {
        self.config.conductive = true;
        self
    }

    /// Allows placements to overwrite this block.
    #[must_use]
    pub fn replaceable(mut self) -> Self {
        self.config.replaceable = true;
        self
    }
}
