//! Connected components of the "closer than threshold" graph over points.
//!
//! Neighbour candidates come from an R-tree (via `rstar`) so the graph is
//! never built explicitly; components are merged with a union-find.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use swarm_core::Vec2;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// A point in the R-tree with its index in the caller's slice.
#[derive(Clone, Copy, Debug)]
struct PointEntry {
    point: [f32; 2],
    index: usize,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PointEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Union-find ────────────────────────────────────────────────────────────────

struct DisjointSets {
    parent: Vec<usize>,
    size:   Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect(), size: vec![1; n] }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns `true` if two distinct sets were merged.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Number of clusters and size of the biggest one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentStats {
    pub count:   usize,
    pub largest: usize,
}

/// Components of the graph joining every pair of points strictly closer than
/// `threshold`.  No points gives `(0, 0)`.
pub fn connected_component_stats(points: &[Vec2], threshold: f32) -> ComponentStats {
    let n = points.len();
    if n == 0 {
        return ComponentStats::default();
    }

    let entries: Vec<PointEntry> = points
        .iter()
        .enumerate()
        .map(|(index, p)| PointEntry { point: p.as_array(), index })
        .collect();
    let tree = RTree::bulk_load(entries.clone());

    let mut sets = DisjointSets::new(n);
    let mut count = n;
    if threshold > 0.0 {
        let t2 = threshold * threshold;
        for entry in &entries {
            for other in tree.locate_within_distance(entry.point, t2) {
                // The query is inclusive; edges need a strict inequality.
                if other.index > entry.index
                    && other.distance_2(&entry.point) < t2
                    && sets.union(entry.index, other.index)
                {
                    count -= 1;
                }
            }
        }
    }

    let largest = (0..n)
        .filter_map(|i| (sets.find(i) == i).then_some(sets.size[i]))
        .max()
        .unwrap_or(0);
    ComponentStats { count, largest }
}
