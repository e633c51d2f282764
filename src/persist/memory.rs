use hashbrown::HashMap;

use crate::record::Hit;

use super::{CacheResult, HitCache};

/// Process-local [`HitCache`].
#[derive(Debug, Default, Clone)]
pub struct MemoryHitCache {
    entries: HashMap<String, Vec<Hit>>,
}

impl MemoryHitCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HitCache for MemoryHitCache {
    fn get(&mut self, call: &str) -> CacheResult<Option<Vec<Hit>>> {
        Ok(self.entries.get(call).cloned())
    }

    fn put(&mut self, call: &str, hits: &[Hit]) -> CacheResult<bool> {
        if self.entries.contains_key(call) {
            return Ok(false);
        }
        self.entries.insert(call.to_string(), hits.to_vec());
        Ok(true)
    }

    fn clear(&mut self) -> CacheResult<()> {
        self.entries.clear();
        Ok(())
    }

    fn len(&mut self) -> CacheResult<usize> {
        Ok(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(country: &str) -> Hit {
        Hit {
            call: "W6OP".to_string(),
            country: country.to_string(),
            ..Hit::default()
        }
    }

    #[test]
    fn first_value_wins() {
        let mut cache = MemoryHitCache::new();
        assert!(cache.put("W6OP", &[hit("United States")]).expect("put"));
        assert!(!cache.put("W6OP", &[hit("Elsewhere")]).expect("put"));
        let cached = cache.get("W6OP").expect("get").expect("present");
        assert_eq!(cached[0].country, "United States");
        assert_eq!(cache.len().expect("len"), 1);
        cache.clear().expect("clear");
        assert!(cache.get("W6OP").expect("get").is_none());
    }
}
