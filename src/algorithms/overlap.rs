//! Transitive overlap grouping via a disjoint-set forest.
//!
//! A pairwise-only scan misreports chains: when A overlaps B and B overlaps C
//! but A ends before C starts, the three usages are one contention window and
//! must be judged together against the resource's capacity. Union-find makes
//! the grouping transitive without ever materializing the pair list.

use crate::algorithms::usage::ResourceUsage;

/// Disjoint-set forest with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Representative of `x`'s set.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the sets containing `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Partitions usage indices into maximal transitively-overlapping groups.
///
/// Returns one index group per connected component, each ordered by first
/// appearance and the groups themselves ordered by their first member, so
/// the output is deterministic for a given usage list. Singleton groups are
/// included; callers that only care about contention skip them.
///
/// The pair scan is O(n²) in the usages of one resource, which stays small:
/// it is bounded by the number of bunks on the board.
pub fn group_overlapping(usages: &[ResourceUsage]) -> Vec<Vec<usize>> {
    let mut sets = DisjointSet::new(usages.len());
    for i in 0..usages.len() {
        for j in (i + 1)..usages.len() {
            if usages[i].overlaps(&usages[j]) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root = vec![usize::MAX; usages.len()];
    for i in 0..usages.len() {
        let root = sets.find(i);
        if group_of_root[root] == usize::MAX {
            group_of_root[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[group_of_root[root]].push(i);
    }
    groups
}
