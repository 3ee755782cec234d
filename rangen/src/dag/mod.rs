mod adjacency;

pub use adjacency::{Adjacency, AdjacencyList, AdjacencyMatrix};

/// Precedence graph with data attached to each vertex.
///
/// The edge `<i, j>` means vertex `i` is an immediate predecessor of vertex `j`. Vertex
/// indices start with 0.
#[derive(Debug, Clone)]
pub struct PrecedenceGraph<T, A = AdjacencyMatrix> {
    vertices: Vec<T>,
    adjacency: A,
}

/// Depth-first search state of a single vertex: its successors and how many of them
/// have been looked at.
struct Frame {
    vertex: usize,
    successors: Vec<usize>,
    cursor: usize,
}

impl Frame {
    fn new(vertex: usize, successors: Vec<usize>) -> Self {
        Self {
            vertex,
            successors,
            cursor: 0,
        }
    }

    fn next_successor(&mut self) -> Option<usize> {
        let next = self.successors.get(self.cursor).copied();
        self.cursor += 1;
        next
    }
}

impl<T: Default, A: Adjacency> PrecedenceGraph<T, A> {
    pub fn new(vertex_count: usize) -> Self {
        let mut graph = Self {
            vertices: vec![],
            adjacency: A::default(),
        };
        graph.init(vertex_count);
        graph
    }

    /// Reserves `vertex_count` default vertices without edges. Calling it again resets
    /// the graph.
    pub fn init(&mut self, vertex_count: usize) {
        self.vertices = (0..vertex_count).map(|_| T::default()).collect();
        self.adjacency.create(vertex_count);
    }
}

impl<T, A: Adjacency> PrecedenceGraph<T, A> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, v: usize) -> &T {
        &self.vertices[v]
    }

    /// Read/write access to the data of vertex `v`.
    pub fn vertex_mut(&mut self, v: usize) -> &mut T {
        &mut self.vertices[v]
    }

    pub fn set_vertex(&mut self, v: usize, value: T) {
        self.vertices[v] = value;
    }

    pub fn vertices(&self) -> &[T] {
        &self.vertices
    }

    /// Adds (`present == true`) or removes the edge `<i, j>`.
    pub fn set_edge(&mut self, i: usize, j: usize, present: bool) {
        self.adjacency.set(i, j, present);
    }

    pub fn get_edge(&self, i: usize, j: usize) -> bool {
        self.adjacency.get(i, j)
    }

    pub fn successors(&self, v: usize) -> Vec<usize> {
        self.adjacency.successors(v)
    }

    pub fn predecessors(&self, v: usize) -> Vec<usize> {
        self.adjacency.predecessors(v)
    }

    /// All edges `<i, j>`, ordered by `i` then `j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.vertex_count()).flat_map(move |i| {
            self.successors(i)
                .into_iter()
                .map(move |j| (i, j))
        })
    }

    /// Checks whether the graph contains a cycle.
    ///
    /// Runs a depth-first search from every vertex that has not been visited yet, so
    /// disconnected parts are covered as well. Reaching a vertex that is still on the
    /// search path closes a cycle. For a DAG this always returns false.
    pub fn is_cyclic(&self) -> bool {
        let vertex_count = self.vertex_count();
        let mut visited = vec![false; vertex_count];
        let mut on_path = vec![false; vertex_count];

        for root in 0..vertex_count {
            if visited[root] {
                continue;
            }

            visited[root] = true;
            on_path[root] = true;
            let mut stack = vec![Frame::new(root, self.successors(root))];

            while let Some(frame) = stack.last_mut() {
                match frame.next_successor() {
                    Some(next) => {
                        if on_path[next] {
                            return true;
                        }

                        if !visited[next] {
                            visited[next] = true;
                            on_path[next] = true;
                            stack.push(Frame::new(next, self.successors(next)));
                        }
                    }
                    None => {
                        on_path[frame.vertex] = false;
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    /// Orders the vertices so that every vertex comes after all of its predecessors.
    ///
    /// Depth-first postorder, reversed. Only meaningful once [`Self::is_cyclic`] returned
    /// false; on a cyclic graph it still terminates but the order has no meaning.
    pub fn topological_sort(&self) -> Vec<usize> {
        let vertex_count = self.vertex_count();
        let mut visited = vec![false; vertex_count];
        let mut postorder = Vec::with_capacity(vertex_count);

        for root in 0..vertex_count {
            if visited[root] {
                continue;
            }

            visited[root] = true;
            let mut stack = vec![Frame::new(root, self.successors(root))];

            while let Some(frame) = stack.last_mut() {
                match frame.next_successor() {
                    Some(next) => {
                        if !visited[next] {
                            visited[next] = true;
                            stack.push(Frame::new(next, self.successors(next)));
                        }
                    }
                    None => {
                        postorder.push(frame.vertex);
                        stack.pop();
                    }
                }
            }
        }

        postorder.reverse();
        postorder
    }
}

#[cfg(test)]
mod tests {
    use petgraph::algo;
    use petgraph::graph::DiGraph;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use super::{Adjacency, AdjacencyList, AdjacencyMatrix, PrecedenceGraph};

    fn graph_from_edges<A: Adjacency>(
        vertex_count: usize,
        edges: &[(usize, usize)],
    ) -> PrecedenceGraph<u32, A> {
        let mut graph = PrecedenceGraph::new(vertex_count);
        for &(i, j) in edges {
            graph.set_edge(i, j, true);
        }
        graph
    }

    fn assert_topological<A: Adjacency>(graph: &PrecedenceGraph<u32, A>, order: &[usize]) {
        assert_eq!(order.len(), graph.vertex_count());

        let mut position = vec![usize::MAX; graph.vertex_count()];
        for (index, &vertex) in order.iter().enumerate() {
            assert_eq!(position[vertex], usize::MAX, "vertex {vertex} listed twice");
            position[vertex] = index;
        }

        for (i, j) in graph.edges() {
            assert!(position[i] < position[j], "<{i}, {j}> violates {order:?}");
        }
    }

    /// Random DAG on shuffled labels, edges only go from lower to higher rank.
    fn random_dag(rng: &mut StdRng, vertex_count: usize, density: f64) -> Vec<(usize, usize)> {
        let mut labels: Vec<usize> = (0..vertex_count).collect();
        labels.shuffle(rng);

        let mut edges = vec![];
        for i in 0..vertex_count {
            for j in (i + 1)..vertex_count {
                if rng.gen_bool(density) {
                    edges.push((labels[i], labels[j]));
                }
            }
        }
        edges
    }

    fn petgraph_is_cyclic(vertex_count: usize, edges: &[(usize, usize)]) -> bool {
        let mut graph = DiGraph::<(), ()>::new();
        let nodes: Vec<_> = (0..vertex_count).map(|_| graph.add_node(())).collect();
        for &(i, j) in edges {
            graph.add_edge(nodes[i], nodes[j], ());
        }
        algo::toposort(&graph, None).is_err()
    }

    #[test]
    fn dag_is_not_cyclic() {
        let graph: PrecedenceGraph<u32> =
            graph_from_edges(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);

        assert!(!graph.is_cyclic());
    }

    #[test]
    fn back_edge_is_cyclic() {
        let mut graph: PrecedenceGraph<u32> =
            graph_from_edges(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);
        graph.set_edge(4, 2, true);

        assert!(graph.is_cyclic());
    }

    #[test]
    fn self_loop_is_cyclic() {
        let graph: PrecedenceGraph<u32> = graph_from_edges(2, &[(0, 0), (0, 1)]);

        assert!(graph.is_cyclic());
    }

    #[test]
    fn cycle_in_later_component_is_found() {
        let graph: PrecedenceGraph<u32> = graph_from_edges(6, &[(0, 1), (3, 4), (4, 5), (5, 3)]);

        assert!(graph.is_cyclic());
    }

    #[test]
    fn duplicate_edges_are_idempotent() {
        let mut graph: PrecedenceGraph<u32> = graph_from_edges(3, &[(0, 1), (1, 2)]);
        graph.set_edge(0, 1, true);

        assert_eq!(graph.edges().count(), 2);
        assert!(!graph.is_cyclic());
    }

    #[test]
    fn topological_sort_is_reverse_postorder() {
        let graph: PrecedenceGraph<u32> = graph_from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);

        assert_eq!(graph.topological_sort(), vec![0, 2, 1, 3]);
    }

    #[test]
    fn topological_sort_covers_disconnected_vertices() {
        let graph: PrecedenceGraph<u32> = graph_from_edges(5, &[(3, 1), (4, 3)]);
        let order = graph.topological_sort();

        assert_topological(&graph, &order);
    }

    #[test]
    fn adjacency_implementations_agree() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let edges = random_dag(&mut rng, 25, 0.2);
            let matrix: PrecedenceGraph<u32, AdjacencyMatrix> = graph_from_edges(25, &edges);
            let list: PrecedenceGraph<u32, AdjacencyList> = graph_from_edges(25, &edges);

            assert_eq!(matrix.topological_sort(), list.topological_sort());
            assert_eq!(matrix.edges().collect::<Vec<_>>(), list.edges().collect::<Vec<_>>());
        }
    }

    #[test]
    fn random_dags_against_petgraph() {
        let mut rng = StdRng::seed_from_u64(42);

        for round in 0..50 {
            let vertex_count = rng.gen_range(1..40);
            let mut edges = random_dag(&mut rng, vertex_count, 0.15);
            let graph: PrecedenceGraph<u32> = graph_from_edges(vertex_count, &edges);

            assert!(!graph.is_cyclic(), "round {round}");
            assert!(!petgraph_is_cyclic(vertex_count, &edges));
            assert_topological(&graph, &graph.topological_sort());

            // a few arbitrary extra edges may or may not close a cycle
            for _ in 0..3 {
                edges.push((
                    rng.gen_range(0..vertex_count),
                    rng.gen_range(0..vertex_count),
                ));
            }
            let graph: PrecedenceGraph<u32> = graph_from_edges(vertex_count, &edges);

            assert_eq!(
                graph.is_cyclic(),
                petgraph_is_cyclic(vertex_count, &edges),
                "round {round}"
            );
        }
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let vertex_count = 200_000;
        let edges: Vec<_> = (1..vertex_count).map(|v| (v - 1, v)).collect();
        let graph: PrecedenceGraph<u32, AdjacencyList> = graph_from_edges(vertex_count, &edges);

        assert!(!graph.is_cyclic());
        assert_eq!(graph.topological_sort(), (0..vertex_count).collect::<Vec<_>>());
    }

    #[test]
    fn init_resets_vertices_and_edges() {
        let mut graph: PrecedenceGraph<u32> = graph_from_edges(3, &[(0, 1)]);
        graph.set_vertex(1, 7);
        *graph.vertex_mut(2) += 3;
        assert_eq!(graph.vertices(), &[0, 7, 3]);
        assert_eq!(graph.predecessors(1), vec![0]);

        graph.init(2);

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.vertices(), &[0, 0]);
        assert!(!graph.get_edge(0, 1));
    }
}
