//! Union-find over arbitrary keys.
//!
//! Path compression plus union by rank; both run iteratively.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{validation_error, Error, GraphResult};

/// Disjoint-set forest.
#[derive(Debug, Clone)]
pub struct DisjointSet<K> {
    keys: Vec<K>,
    index: HashMap<K, usize>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl<K> DisjointSet<K>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Create an empty forest.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }

    /// Number of keys registered.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Register `key` as a singleton set. Keys must be distinct.
    pub fn new_set(&mut self, key: K) -> GraphResult<(), K> {
        if self.index.contains_key(&key) {
            return Err(validation_error!("duplicate disjoint-set key {:?}", key));
        }
        let id = self.keys.len();
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.parent.push(id);
        self.rank.push(0);
        Ok(())
    }

    /// Representative key of the set containing `key`.
    pub fn find(&mut self, key: &K) -> GraphResult<K, K> {
        let id = self.id_of(key)?;
        let root = self.find_root(id);
        Ok(self.keys[root].clone())
    }

    /// Whether two keys currently share a set.
    pub fn same_set(&mut self, a: &K, b: &K) -> GraphResult<bool, K> {
        let (a, b) = (self.id_of(a)?, self.id_of(b)?);
        Ok(self.find_root(a) == self.find_root(b))
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns `false` if they were already in the same set.
    pub fn union(&mut self, a: &K, b: &K) -> GraphResult<bool, K> {
        let (a, b) = (self.id_of(a)?, self.id_of(b)?);
        let (ra, rb) = (self.find_root(a), self.find_root(b));
        if ra == rb {
            return Ok(false);
        }

        if self.rank[ra] > self.rank[rb] {
            self.parent[rb] = ra;
        } else {
            self.parent[ra] = rb;
            if self.rank[ra] == self.rank[rb] {
                self.rank[rb] += 1;
            }
        }
        Ok(true)
    }

    fn id_of(&self, key: &K) -> GraphResult<usize, K> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| Error::KeyNotFound(key.clone()))
    }

    fn find_root(&mut self, id: usize) -> usize {
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut node = id;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }
}

impl<K> Default for DisjointSet<K>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(keys: &[&'static str]) -> DisjointSet<&'static str> {
        let mut d = DisjointSet::new();
        for &k in keys {
            d.new_set(k).unwrap();
        }
        d
    }

    #[test]
    fn test_singletons() {
        let mut d = forest(&["a", "b"]);
        assert_eq!(d.find(&"a"), Ok("a"));
        assert_eq!(d.find(&"b"), Ok("b"));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut d = forest(&["a"]);
        assert!(matches!(d.new_set("a"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_key() {
        let mut d = forest(&["a"]);
        assert_eq!(d.find(&"z"), Err(Error::KeyNotFound("z")));
        assert_eq!(d.union(&"a", &"z"), Err(Error::KeyNotFound("z")));
    }

    #[test]
    fn test_union_merges() {
        let mut d = forest(&["a", "b", "c", "d"]);
        assert_eq!(d.union(&"a", &"b"), Ok(true));
        assert_eq!(d.union(&"c", &"d"), Ok(true));
        assert_eq!(d.same_set(&"a", &"c"), Ok(false));
        assert_eq!(d.union(&"b", &"d"), Ok(true));
        assert_eq!(d.same_set(&"a", &"c"), Ok(true));
        assert_eq!(d.find(&"a"), d.find(&"d"));
        assert_eq!(d.union(&"a", &"d"), Ok(false));
    }

    #[test]
    fn test_long_chain() {
        let mut d = DisjointSet::new();
        for i in 0..1000u32 {
            d.new_set(i).unwrap();
        }
        for i in 1..1000u32 {
            d.union(&(i - 1), &i).unwrap();
        }
        let root = d.find(&0).unwrap();
        assert!((0..1000u32).all(|i| d.find(&i) == Ok(root)));
    }
}
