use hashbrown::HashSet;

use crate::{
    index::{EntityMaskIndex, PrefixIndex, ProbeMode},
    mask::query_shape,
};

/// An entity that survived a search, with its rank for that query.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    /// Matched entity.
    pub entity: &'a EntityMaskIndex,
    /// Longest leading run of the search term over the entity's masks.
    /// A wildcard survivor carries the query's maximum.
    pub rank: usize,
    /// Matched through a two-slot mask.
    pub wildcard: bool,
}

/// Keeps the entities at the highest rank. When `keep_wildcards` is set a
/// wildcard match counts as any rank and is raised to the maximum.
fn keep_max_rank(found: Vec<Ranked<'_>>, keep_wildcards: bool) -> Vec<Ranked<'_>> {
    let Some(max) = found.iter().map(|r| r.rank).max() else {
        return found;
    };
    found
        .into_iter()
        .filter_map(|r| {
            if r.rank == max {
                Some(r)
            } else if keep_wildcards && r.wildcard {
                Some(Ranked { rank: max, ..r })
            } else {
                None
            }
        })
        .collect()
}

fn collect<'a>(
    index: &'a PrefixIndex,
    candidates: &[crate::types::EntityId],
    probe: &[u8],
    term: &[u8],
    mode: ProbeMode,
) -> Vec<Ranked<'a>> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for id in candidates {
        let Some(entity) = index.entity(*id) else {
            continue;
        };
        if !entity.index_keys().admits(probe) {
            continue;
        }
        let Some(wildcard) = entity.match_probe(probe, mode) else {
            continue;
        };
        if !seen.insert(entity.identity()) {
            continue;
        }
        found.push(Ranked {
            entity,
            rank: entity.rank(term, mode),
            wildcard,
        });
    }
    found
}

/// Searches the call-sign dictionary with progressively shorter shapes.
///
/// The first probe is closed and covers all of `term`; later probes are
/// open and drop one trailing character each. Stops at the first probe
/// length that yields any entity.
pub fn main_dictionary<'a>(index: &'a PrefixIndex, term: &[u8]) -> Vec<Ranked<'a>> {
    let mut shape = query_shape(term);
    shape.push('.');
    let mut mode = ProbeMode::Closed;
    while shape.len() > 1 {
        let probe_len = match mode {
            ProbeMode::Closed => shape.len() - 1,
            _ => shape.len(),
        };
        let probe = &term[..probe_len.min(term.len())];
        let candidates = index.dictionary().call_sign(&shape);
        let found = collect(index, candidates, probe, term, mode);
        if !found.is_empty() {
            log::trace!(
                "main search {:?} settled on shape {shape} with {} candidates",
                String::from_utf8_lossy(term),
                found.len()
            );
            return keep_max_rank(found, true);
        }
        shape.pop();
        mode = ProbeMode::Open;
    }
    Vec::new()
}

/// Searches the portable-prefix dictionary for `prefix`, adding the `/`
/// when missing. Only the single highest rank survives.
pub fn portable_prefix<'a>(index: &'a PrefixIndex, prefix: &str) -> Vec<Ranked<'a>> {
    let mut term = prefix.as_bytes().to_vec();
    if term.last() != Some(&b'/') {
        term.push(b'/');
    }
    let shape = query_shape(&term);
    let candidates = index.dictionary().portable(&shape);
    let found = collect(index, candidates, &term, &term, ProbeMode::Portable);
    keep_max_rank(found, false)
}
