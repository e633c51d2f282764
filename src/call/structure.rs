use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{CallStructureType, SignFlag};

/// Classified call sign. Immutable once built; derived forms are new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStructure {
    full_call: String,
    base_call: String,
    prefix: Option<String>,
    suffix: Option<String>,
    structure_type: CallStructureType,
    flags: BTreeSet<SignFlag>,
}

impl CallStructure {
    pub(crate) fn new(
        full_call: String,
        base_call: &str,
        structure_type: CallStructureType,
    ) -> Self {
        Self {
            full_call,
            base_call: base_call.to_string(),
            prefix: None,
            suffix: None,
            structure_type,
            flags: BTreeSet::new(),
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub(crate) fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub(crate) fn with_flags(mut self, flags: BTreeSet<SignFlag>) -> Self {
        self.flags = flags;
        self
    }

    /// Structure that carries no meaning; lookups on it return nothing.
    pub fn invalid(full_call: impl Into<String>) -> Self {
        Self::new(full_call.into(), "", CallStructureType::Invalid)
    }

    /// Same call re-read under another form and prefix.
    ///
    /// Used by call-area substitution; flags and suffix are kept.
    pub fn reclassified(&self, structure_type: CallStructureType, prefix: Option<String>) -> Self {
        Self {
            structure_type,
            prefix,
            ..self.clone()
        }
    }

    /// Cleaned input.
    pub fn full_call(&self) -> &str {
        &self.full_call
    }

    /// The call-sign token.
    pub fn base_call(&self) -> &str {
        &self.base_call
    }

    /// Prefix or location override, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Modifier token(s), if any.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Structural form.
    pub fn structure_type(&self) -> CallStructureType {
        self.structure_type
    }

    /// Derived flags.
    pub fn flags(&self) -> &BTreeSet<SignFlag> {
        &self.flags
    }

    /// True unless the form is [`CallStructureType::Invalid`].
    pub fn is_valid(&self) -> bool {
        self.structure_type != CallStructureType::Invalid
    }

    /// Text searched in the main dictionary: the prefix for prefix-first
    /// forms, otherwise the base call.
    pub fn search_term(&self) -> &str {
        match (&self.prefix, self.structure_type.is_prefix_first()) {
            (Some(prefix), true) => prefix,
            _ => &self.base_call,
        }
    }
}
