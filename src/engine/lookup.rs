use std::sync::Arc;

use crate::{
    call::{classify, CallStructure},
    index::PrefixIndex,
    record::Hit,
    types::{CallStructureType, Correlation, SignFlag},
};

use super::{
    area::{replace_call_area, AreaPrefix},
    search::{main_dictionary, portable_prefix, Ranked},
    traits::CallbookSource,
};

/// Resolves call signs against a shared, read-only [`PrefixIndex`].
///
/// Cloning is cheap; every lookup is independent of every other.
#[derive(Debug, Clone)]
pub struct LookupEngine {
    index: Arc<PrefixIndex>,
}

impl LookupEngine {
    /// Engine over an owned index.
    pub fn new(index: PrefixIndex) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    /// The index searched by this engine.
    pub fn index(&self) -> &PrefixIndex {
        &self.index
    }

    /// Classifies `call` against this engine's portable shapes.
    pub fn classify(&self, call: &str) -> CallStructure {
        classify(call, self.index.dictionary())
    }

    /// Hits for `call`, lowest rank first. Empty for unusable or unknown calls.
    pub fn lookup(&self, call: &str) -> Vec<Hit> {
        self.lookup_correlated(call, Correlation::default())
    }

    /// [`Self::lookup`] with caller correlation copied onto each hit.
    pub fn lookup_correlated(&self, call: &str, correlation: Correlation) -> Vec<Hit> {
        let structure = self.classify(call);
        self.lookup_structure(&structure, correlation)
    }

    /// Hits for an already classified call.
    pub fn lookup_structure(&self, structure: &CallStructure, correlation: Correlation) -> Vec<Hit> {
        let ranked = self.ranked(structure);
        let mut flags = structure.flags().clone();
        if ranked.len() > 1 {
            flags.insert(SignFlag::AmbiguousPrefix);
        }
        ranked
            .into_iter()
            .map(|r| Hit::from_entity(structure.full_call(), r.entity, &flags, correlation))
            .collect()
    }

    /// Asks `callbook` first and falls back to the prefix database.
    pub fn lookup_with_callbook(
        &self,
        call: &str,
        callbook: &dyn CallbookSource,
        correlation: Correlation,
    ) -> Vec<Hit> {
        let structure = self.classify(call);
        if !structure.is_valid() {
            return Vec::new();
        }
        if let Some(mut hit) = callbook.lookup(structure.full_call()) {
            log::debug!("{} answered {}", callbook.name(), structure.full_call());
            hit.call = structure.full_call().to_string();
            hit.flags = structure.flags().clone();
            hit.correlate(correlation);
            return vec![hit];
        }
        self.lookup_structure(&structure, correlation)
    }

    /// Independent lookups, one result list per input, in input order.
    pub fn lookup_batch<S: AsRef<str>>(&self, calls: &[S]) -> Vec<Vec<Hit>> {
        calls.iter().map(|c| self.lookup(c.as_ref())).collect()
    }

    /// Surviving entities with their ranks, lowest rank first.
    pub fn ranked(&self, structure: &CallStructure) -> Vec<Ranked<'_>> {
        let mut found = self.dispatch(structure);
        found.sort_by_key(|r| r.rank);
        found
    }

    fn dispatch(&self, structure: &CallStructure) -> Vec<Ranked<'_>> {
        let kind = structure.structure_type();
        match kind {
            CallStructureType::Invalid => return Vec::new(),
            _ if kind.uses_portable_prefix() => {
                if let Some(prefix) = structure.prefix() {
                    let found = portable_prefix(&self.index, prefix);
                    if !found.is_empty() {
                        log::debug!("{} resolved by portable prefix {prefix}", structure.full_call());
                        return found;
                    }
                }
            }
            CallStructureType::CallDigit => {
                if let Some(found) = self.substitute_call_area(structure) {
                    return found;
                }
            }
            _ => {}
        }
        main_dictionary(&self.index, structure.search_term().as_bytes())
    }

    /// Re-dispatches `W6OP/4` style calls under the replaced area prefix.
    ///
    /// `None` when no substitution applies and the main search should run.
    fn substitute_call_area(&self, structure: &CallStructure) -> Option<Vec<Ranked<'_>>> {
        let digit = structure.prefix()?;
        let base = structure.base_call();
        let own_digit = base.bytes().find(u8::is_ascii_digit)?;
        if digit.as_bytes() == [own_digit] {
            let plain = structure.reclassified(CallStructureType::Call, None);
            return Some(self.dispatch(&plain));
        }

        let found = main_dictionary(&self.index, base.as_bytes());
        let best = found.iter().map(|r| r.rank).max()?;
        let top = found.iter().find(|r| r.rank == best)?;
        let next = match replace_call_area(top.entity.main_prefix(), digit)? {
            AreaPrefix::Replaced(prefix) => {
                log::debug!("{} searched as {prefix}{base}", structure.full_call());
                structure.reclassified(CallStructureType::PrefixCall, Some(prefix))
            }
            AreaPrefix::Dropped => structure.reclassified(CallStructureType::Call, None),
        };
        Some(self.dispatch(&next))
    }
}
