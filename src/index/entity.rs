use std::hash::{Hash, Hasher};

use crate::{
    mask::{expand_mask, CharSet, ExpandedMask},
    record::EntityRecord,
    types::{DxccId, EntityId, EntityKind},
};

use super::ConfigError;

/// Number of leading positions summarised by [`IndexKeys`].
pub const KEY_POSITIONS: usize = 4;

/// Union of every mask's first four slots; used to reject candidates cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexKeys([CharSet; KEY_POSITIONS]);

impl IndexKeys {
    fn from_masks(masks: &[ExpandedMask]) -> Self {
        let mut keys = [CharSet::EMPTY; KEY_POSITIONS];
        for mask in masks {
            for (key, slot) in keys.iter_mut().zip(mask.slots()) {
                *key = key.union(*slot);
            }
        }
        Self(keys)
    }

    /// Characters any mask accepts at `position`; empty past the last key.
    pub fn at(&self, position: usize) -> CharSet {
        self.0.get(position).copied().unwrap_or(CharSet::EMPTY)
    }

    /// Every checked position of `probe` is accepted by some mask.
    pub fn admits(&self, probe: &[u8]) -> bool {
        self.0
            .iter()
            .zip(probe)
            .all(|(key, c)| key.contains(*c))
    }
}

/// Which masks and which match rule a probe uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// Full-length probe against masks that end in `.`.
    Closed,
    /// Probe against open masks of the same length.
    Open,
    /// Probe ending in `/` against portable masks.
    Portable,
}

/// Fields that decide whether two entities are the same hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityIdentity<'a> {
    /// DXCC entity number.
    pub dxcc: DxccId,
    /// Province.
    pub province: &'a str,
    /// Main prefix.
    pub main_prefix: &'a str,
    /// City.
    pub city: &'a str,
    /// Full label.
    pub full_prefix: &'a str,
    /// Country.
    pub country: &'a str,
}

/// One entity with its masks expanded and its lookup keys precomputed.
#[derive(Debug, Clone)]
pub struct EntityMaskIndex {
    id: EntityId,
    record: EntityRecord,
    main_prefix: String,
    masks: Vec<ExpandedMask>,
    keys: IndexKeys,
}

impl EntityMaskIndex {
    /// Expands every mask of `record`.
    ///
    /// Masks are kept longest first with duplicates removed. DXCC records
    /// drop their province text.
    pub fn from_record(id: EntityId, mut record: EntityRecord) -> Result<Self, ConfigError> {
        let mut masks = Vec::with_capacity(record.masks.len());
        for raw in &record.masks {
            let mask = expand_mask(raw).map_err(|error| ConfigError::Mask {
                label: record.label.clone(),
                mask: raw.clone(),
                error,
            })?;
            if !masks.contains(&mask) {
                masks.push(mask);
            }
        }
        masks.sort_by(|a, b| b.len().cmp(&a.len()));

        if record.kind == EntityKind::Dxcc {
            record.province.clear();
        }
        let main_prefix = match record.label.split_once('.') {
            Some((_, rest)) => rest.to_string(),
            None => record.label.clone(),
        };
        let keys = IndexKeys::from_masks(&masks);
        Ok(Self {
            id,
            record,
            main_prefix,
            masks,
            keys,
        })
    }

    /// Position inside the owning index.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The source record.
    pub fn record(&self) -> &EntityRecord {
        &self.record
    }

    /// Record kind.
    pub fn kind(&self) -> EntityKind {
        self.record.kind
    }

    /// Full label, e.g. `3B6.3B7`.
    pub fn full_prefix(&self) -> &str {
        &self.record.label
    }

    /// Label text after the first `.`, or the whole label.
    pub fn main_prefix(&self) -> &str {
        &self.main_prefix
    }

    /// Expanded masks, longest first.
    pub fn masks(&self) -> &[ExpandedMask] {
        &self.masks
    }

    /// Precomputed leading-position keys.
    pub fn index_keys(&self) -> &IndexKeys {
        &self.keys
    }

    /// Deduplication key.
    pub fn identity(&self) -> EntityIdentity<'_> {
        EntityIdentity {
            dxcc: self.record.dxcc,
            province: &self.record.province,
            main_prefix: &self.main_prefix,
            city: &self.record.city,
            full_prefix: &self.record.label,
            country: &self.record.country,
        }
    }

    /// Checks `probe` against the masks selected by `mode`.
    ///
    /// Returns `None` when nothing matches, otherwise whether a matching
    /// mask has only two slots.
    pub fn match_probe(&self, probe: &[u8], mode: ProbeMode) -> Option<bool> {
        let mut matched = false;
        let mut wildcard = false;
        for mask in &self.masks {
            let hit = match mode {
                ProbeMode::Closed => mask.matches_closed(probe),
                ProbeMode::Open => mask.matches_open(probe),
                ProbeMode::Portable => mask.matches_portable(probe),
            };
            if hit {
                matched = true;
                wildcard |= mask.len() == 2;
            }
        }
        matched.then_some(wildcard)
    }

    /// Longest leading run of `term` over the masks of one family.
    ///
    /// Portable mode ranks portable masks; the other modes rank the rest.
    pub fn rank(&self, term: &[u8], mode: ProbeMode) -> usize {
        self.masks
            .iter()
            .filter(|m| match mode {
                ProbeMode::Portable => m.is_portable(),
                ProbeMode::Closed | ProbeMode::Open => !m.is_portable_only(),
            })
            .map(|m| m.leading_run(term))
            .max()
            .unwrap_or(0)
    }
}

impl PartialEq for EntityMaskIndex {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for EntityMaskIndex {}

impl Hash for EntityMaskIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}
