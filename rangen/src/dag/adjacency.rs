use std::collections::BTreeSet;

/// Edge storage behind a [`PrecedenceGraph`](super::PrecedenceGraph).
///
/// Indices start with 0, valid values are `0..vertex_count()`. Passing anything else is a
/// programming error and panics.
pub trait Adjacency: Default {
    /// Reserves storage for `vertex_count` vertices without any edges, dropping whatever
    /// was stored before.
    fn create(&mut self, vertex_count: usize);

    /// Adds (`present == true`) or removes the edge `<i, j>`.
    fn set(&mut self, i: usize, j: usize, present: bool);

    /// Whether `<i, j>` belongs to the edge set.
    fn get(&self, i: usize, j: usize) -> bool;

    fn vertex_count(&self) -> usize;

    /// Direct successors of `v` in ascending order.
    fn successors(&self, v: usize) -> Vec<usize> {
        (0..self.vertex_count())
            .filter(|&j| self.get(v, j))
            .collect()
    }

    /// Direct predecessors of `v` in ascending order.
    fn predecessors(&self, v: usize) -> Vec<usize> {
        (0..self.vertex_count())
            .filter(|&i| self.get(i, v))
            .collect()
    }
}

/// Dense `n x n` edge-presence matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    vertex_count: usize,
    /// Row `i` holds the outgoing edges of vertex `i`.
    edges: Vec<bool>,
}

impl AdjacencyMatrix {
    pub fn new(vertex_count: usize) -> Self {
        let mut matrix = Self::default();
        matrix.create(vertex_count);
        matrix
    }

    fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.vertex_count && j < self.vertex_count,
            "edge <{i}, {j}> is out of range for {} vertices",
            self.vertex_count
        );
        i * self.vertex_count + j
    }
}

impl Adjacency for AdjacencyMatrix {
    fn create(&mut self, vertex_count: usize) {
        self.vertex_count = vertex_count;
        self.edges = vec![false; vertex_count * vertex_count];
    }

    fn set(&mut self, i: usize, j: usize, present: bool) {
        let index = self.index(i, j);
        self.edges[index] = present;
    }

    fn get(&self, i: usize, j: usize) -> bool {
        self.edges[self.index(i, j)]
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

/// Sparse storage for large instances, keeps sorted successor and predecessor sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyList {
    successors: Vec<BTreeSet<usize>>,
    predecessors: Vec<BTreeSet<usize>>,
}

impl AdjacencyList {
    pub fn new(vertex_count: usize) -> Self {
        let mut list = Self::default();
        list.create(vertex_count);
        list
    }

    fn check_bounds(&self, i: usize, j: usize) {
        assert!(
            i < self.vertex_count() && j < self.vertex_count(),
            "edge <{i}, {j}> is out of range for {} vertices",
            self.vertex_count()
        );
    }
}

impl Adjacency for AdjacencyList {
    fn create(&mut self, vertex_count: usize) {
        self.successors = vec![BTreeSet::new(); vertex_count];
        self.predecessors = vec![BTreeSet::new(); vertex_count];
    }

    fn set(&mut self, i: usize, j: usize, present: bool) {
        self.check_bounds(i, j);

        if present {
            self.successors[i].insert(j);
            self.predecessors[j].insert(i);
        } else {
            self.successors[i].remove(&j);
            self.predecessors[j].remove(&i);
        }
    }

    fn get(&self, i: usize, j: usize) -> bool {
        self.check_bounds(i, j);
        self.successors[i].contains(&j)
    }

    fn vertex_count(&self) -> usize {
        self.successors.len()
    }

    fn successors(&self, v: usize) -> Vec<usize> {
        self.successors[v].iter().copied().collect()
    }

    fn predecessors(&self, v: usize) -> Vec<usize> {
        self.predecessors[v].iter().copied().collect()
    }
}
