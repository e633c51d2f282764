use hashbrown::HashMap;

use crate::{
    mask::{shape_patterns, ShapePattern},
    record::EntityRecord,
    types::{DxccId, EntityId, EntityKind},
};

use super::{entity::EntityMaskIndex, ConfigError};

/// Shape pattern to entity lookup tables.
#[derive(Debug, Clone, Default)]
pub struct PatternDictionary {
    call_sign_patterns: HashMap<ShapePattern, Vec<EntityId>>,
    portable_prefix_patterns: HashMap<ShapePattern, Vec<EntityId>>,
}

impl PatternDictionary {
    fn insert(&mut self, pattern: ShapePattern, id: EntityId, kind: EntityKind) {
        let table = if pattern.ends_with('/') {
            &mut self.portable_prefix_patterns
        } else if kind == EntityKind::InvalidPrefix {
            return;
        } else {
            &mut self.call_sign_patterns
        };
        let bucket = table.entry(pattern).or_default();
        // Entities are inserted one at a time, so a repeat is always the tail.
        if bucket.last() != Some(&id) {
            bucket.push(id);
        }
    }

    /// Entities reachable through a call-sign shape, in load order.
    pub fn call_sign(&self, pattern: &str) -> &[EntityId] {
        self.call_sign_patterns
            .get(pattern)
            .map_or(&[], Vec::as_slice)
    }

    /// Entities reachable through a portable shape (ending in `/`), in load order.
    pub fn portable(&self, pattern: &str) -> &[EntityId] {
        self.portable_prefix_patterns
            .get(pattern)
            .map_or(&[], Vec::as_slice)
    }

    /// True when some entity has a portable mask of this shape.
    pub fn has_portable_shape(&self, pattern: &str) -> bool {
        self.portable_prefix_patterns.contains_key(pattern)
    }

    /// Number of call-sign shapes.
    pub fn call_sign_shapes(&self) -> usize {
        self.call_sign_patterns.len()
    }

    /// Number of portable shapes.
    pub fn portable_shapes(&self) -> usize {
        self.portable_prefix_patterns.len()
    }
}

/// Immutable lookup tables built once from the entity database.
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
    entities: Vec<EntityMaskIndex>,
    dictionary: PatternDictionary,
    by_dxcc: HashMap<DxccId, EntityId>,
    by_wae: HashMap<u32, EntityId>,
}

/// Expands every record and fills the pattern dictionary.
///
/// Pure over its input; any malformed mask fails the whole build.
pub fn build_index<I>(records: I) -> Result<PrefixIndex, ConfigError>
where
    I: IntoIterator<Item = EntityRecord>,
{
    let mut index = PrefixIndex::default();
    for record in records {
        let id = EntityId::try_from(index.entities.len())
            .map_err(|_| ConfigError::TooManyEntities)?;
        let entity = EntityMaskIndex::from_record(id, record)?;

        for mask in entity.masks() {
            let patterns = shape_patterns(mask).map_err(|error| ConfigError::Mask {
                label: entity.full_prefix().to_string(),
                mask: format!("{mask:?}"),
                error,
            })?;
            for pattern in patterns {
                index.dictionary.insert(pattern, id, entity.kind());
            }
        }

        let r = entity.record();
        match r.kind {
            EntityKind::Dxcc => {
                index.by_dxcc.insert(r.dxcc, id);
            }
            EntityKind::InvalidPrefix => {
                index.by_dxcc.insert(0, id);
            }
            _ => {}
        }
        if r.wae != 0 {
            index.by_wae.insert(r.wae, id);
        }
        index.entities.push(entity);
    }
    log::debug!(
        "prefix index built: {} entities, {} call shapes, {} portable shapes",
        index.entities.len(),
        index.dictionary.call_sign_shapes(),
        index.dictionary.portable_shapes()
    );
    Ok(index)
}

impl PrefixIndex {
    /// Entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&EntityMaskIndex> {
        self.entities.get(id as usize)
    }

    /// All entities in load order.
    pub fn entities(&self) -> &[EntityMaskIndex] {
        &self.entities
    }

    /// Shape tables.
    pub fn dictionary(&self) -> &PatternDictionary {
        &self.dictionary
    }

    /// DXCC record for an entity number; 0 resolves to the invalid-prefix record.
    pub fn entity_by_dxcc(&self, dxcc: DxccId) -> Option<&EntityMaskIndex> {
        self.by_dxcc.get(&dxcc).and_then(|id| self.entity(*id))
    }

    /// Record carrying a WAE entity number.
    pub fn entity_by_wae(&self, wae: u32) -> Option<&EntityMaskIndex> {
        self.by_wae.get(&wae).and_then(|id| self.entity(*id))
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity was loaded.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
