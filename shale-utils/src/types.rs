// Wrapper types making it harder to accidentally use the wrong underlying type.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::math::{vector2::Vector2, vector3::Vector3};

/// A raw block state id. Using the registry this id can be resolved into a
/// block and the values of its properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockStateId(pub u16);

/// A dense id assigned to a registered block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u16);

/// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos(pub Vector3<i32>);

/// A 16x16 column address, used to bucket tick containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionPos(pub Vector2<i32>);

impl BlockPos {
    /// Creates a block position from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The x component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    /// The y component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.0.y
    }

    /// The z component.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.0.z
    }

    /// Returns the position offset by the given deltas.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self(Vector3::new(self.0.x + dx, self.0.y + dy, self.0.z + dz))
    }

    /// Returns the adjacent position in the given direction.
    #[must_use]
    pub const fn relative(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        self.offset(dx, dy, dz)
    }

    /// Returns the section column containing this position.
    #[must_use]
    pub const fn section(&self) -> SectionPos {
        SectionPos(Vector2::new(self.0.x >> 4, self.0.z >> 4))
    }
}

impl SectionPos {
    /// Creates a section position from its components.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

bitflags! {
    /// Flags selecting which follow-up work a block replacement performs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UpdateFlags: u8 {
        /// Notify the six neighbors through their `neighbor_changed` callback.
        const UPDATE_NEIGHBORS = 0b0000_0001;
        /// Let the six neighbors adapt their own state through `update_shape`.
        const UPDATE_SHAPE = 0b0000_0010;
        /// Both neighbor notifications and shape updates.
        const UPDATE_ALL = Self::UPDATE_NEIGHBORS.bits() | Self::UPDATE_SHAPE.bits();
    }
}

/// A namespaced name, written `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The namespace part. Lowercase ascii, digits, `_`, `-` and `.`.
    pub namespace: Cow<'static, str>,
    /// The path part. Like the namespace but also allows `/`.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// The namespace used for the engine's built-in entries.
    pub const DEFAULT_NAMESPACE: &'static str = "shale";

    /// Creates an identifier in the default namespace.
    #[must_use]
    pub const fn shale(path: &'static str) -> Self {
        Identifier {
            namespace: Cow::Borrowed(Self::DEFAULT_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// Creates an identifier from owned parts.
    #[must_use]
    pub fn new(namespace: String, path: String) -> Self {
        Identifier {
            namespace: Cow::Owned(namespace),
            path: Cow::Owned(path),
        }
    }

    /// Whether the character may appear in a namespace.
    #[must_use]
    pub fn valid_namespace_char(c: char) -> bool {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
    }

    /// Whether the character may appear in a path.
    ///
    /// Paths additionally allow `/` as a separator.
    #[must_use]
    pub fn valid_path_char(c: char) -> bool {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/')
    }

    /// Validates a namespace string.
    #[must_use]
    pub fn validate_namespace(namespace: &str) -> bool {
        !namespace.is_empty() && namespace.chars().all(Self::valid_namespace_char)
    }

    /// Validates a path string.
    #[must_use]
    pub fn validate_path(path: &str) -> bool {
        !path.is_empty() && path.chars().all(Self::valid_path_char)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((namespace, path)) = s.split_once(':') else {
            return Err(format!("Invalid identifier: {s}"));
        };

        if !Identifier::validate_namespace(namespace) {
            return Err(format!("Invalid namespace: {namespace}"));
        }

        if !Identifier::validate_path(path) {
            return Err(format!("Invalid path: {path}"));
        }

        Ok(Identifier {
            namespace: Cow::Owned(namespace.to_string()),
            path: Cow::Owned(path.to_string()),
        })
    }
}
