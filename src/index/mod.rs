//! Entity mask index and shape pattern dictionary.

use std::fmt;

use crate::mask::MaskError;

/// Pattern dictionary and prefix index builder.
pub mod dictionary;
/// Per-entity expanded masks and index keys.
pub mod entity;

pub use dictionary::{build_index, PatternDictionary, PrefixIndex};
pub use entity::{EntityIdentity, EntityMaskIndex, IndexKeys, ProbeMode};

/// Entity database rejected while building the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A mask failed to expand or to produce shape patterns.
    Mask {
        /// Label of the owning record.
        label: String,
        /// Offending mask.
        mask: String,
        /// Parser error.
        error: MaskError,
    },
    /// More records than an [`crate::types::EntityId`] can address.
    TooManyEntities,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mask { label, mask, error } => {
                write!(f, "entity {label}: mask {mask:?}: {error}")
            }
            Self::TooManyEntities => f.write_str("too many entity records"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mask { error, .. } => Some(error),
            Self::TooManyEntities => None,
        }
    }
}
