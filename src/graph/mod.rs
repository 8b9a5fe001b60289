//! Relationship distance over the person/union graph.
//!
//! The graph is bipartite: person nodes link to family nodes (`FAMC`/
//! `FAMS`) and family nodes link back to person nodes (`HUSB`/`WIFE`/
//! `CHIL`). Distance between two persons is counted in person-hops, so one
//! hop spans two substeps of the alternating breadth-first search.
//!
//! Layers are computed lazily and kept for the lifetime of the cache, which
//! is keyed by its origin person - one instance per viewing context. A
//! visited set guarantees termination on cyclic graphs (remarriage,
//! step-families) and gives shortest-hop semantics.

use crate::error::Result;
use crate::store::RecordStore;
use rustc_hash::{FxHashMap, FxHashSet};

/// Memoized bounded-distance search from one origin person
#[derive(Debug)]
pub struct RelationshipCache {
    origin: String,
    /// Alternating layers: even indices hold person xrefs, odd indices
    /// hold family xrefs
    layers: Vec<Vec<String>>,
    visited: FxHashSet<String>,
    results: FxHashMap<(String, u32), bool>,
}

impl RelationshipCache {
    /// Create a cache rooted at the given origin person
    #[must_use]
    pub fn new(origin: &str) -> Self {
        let mut visited = FxHashSet::default();
        visited.insert(origin.to_string());
        Self {
            origin: origin.to_string(),
            layers: vec![vec![origin.to_string()]],
            visited,
            results: FxHashMap::default(),
        }
    }

    /// The origin person this cache is keyed by
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether `target` is within `max_distance` person-hops of the origin.
    ///
    /// Early-exits true as soon as the target appears at or before the
    /// required layer; exhausting all layers returns false. Results are
    /// memoized per `(target, max_distance)`.
    ///
    /// # Errors
    /// Only record-store transport failures propagate; a dangling
    /// reference is a dead-end edge.
    pub fn is_within_distance(
        &mut self,
        store: &dyn RecordStore,
        target: &str,
        max_distance: u32,
    ) -> Result<bool> {
        if target == self.origin {
            return Ok(true);
        }
        let key = (target.to_string(), max_distance);
        if let Some(&known) = self.results.get(&key) {
            return Ok(known);
        }

        // One person-hop is two substeps: person->family and family->person
        let substeps = max_distance as usize * 2;
        let mut found = false;
        for layer in 0..=substeps {
            self.expand_to(store, layer)?;
            if layer % 2 == 0 && self.layers[layer].iter().any(|xref| xref == target) {
                found = true;
                break;
            }
        }

        self.results.insert(key, found);
        Ok(found)
    }

    /// Compute layers up to and including `layer`, if not already present
    fn expand_to(&mut self, store: &dyn RecordStore, layer: usize) -> Result<()> {
        while self.layers.len() <= layer {
            let depth = self.layers.len();
            let previous = self.layers[depth - 1].clone();
            let mut next = Vec::new();

            for xref in &previous {
                let neighbours: Vec<String> = if depth % 2 == 1 {
                    // person -> family substep
                    match store.person(xref)? {
                        Some(person) => person
                            .family_xrefs()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                        None => Vec::new(),
                    }
                } else {
                    // family -> person substep
                    match store.family(xref)? {
                        Some(family) => family
                            .member_xrefs()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                        None => Vec::new(),
                    }
                };
                for neighbour in neighbours {
                    // No revisiting: nodes already seen at an earlier layer
                    // are never re-added, so the search terminates on cycles
                    if self.visited.insert(neighbour.clone()) {
                        next.push(neighbour);
                    }
                }
            }

            log::trace!(
                "relationship search from {}: layer {depth} has {} nodes",
                self.origin,
                next.len()
            );
            self.layers.push(next);
        }
        Ok(())
    }
}
