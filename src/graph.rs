use crate::membership::Membership;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub usize);

/// An undirected edge between two distinct vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: VertexId,
    pub target: VertexId,
    pub membership: Membership,
}

impl Edge {
    /// The endpoint of this edge which is not `v`.
    pub fn opposite(&self, v: VertexId) -> VertexId {
        if self.source == v {
            self.target
        } else {
            self.source
        }
    }

    fn joins(&self, u: VertexId, v: VertexId) -> bool {
        (self.source == u && self.target == v) || (self.source == v && self.target == u)
    }
}

/// A [`CoreGraph`] is the single graph underlying a rule.
///
/// Vertices and edges are stored in flat arrays indexed by [`VertexId`] and [`EdgeId`], and each
/// element carries its [`Membership`].
/// The graph is simple: there are no self-loops and at most one edge between any pair of vertices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreGraph {
    /// Vertex memberships. Defines a finite map from [`VertexId`] to [`Membership`]
    vertices: Vec<Membership>,

    /// Edges, each with its endpoints and membership.
    edges: Vec<Edge>,

    // incidence lists: for each vertex, the edges touching it
    incidence: Vec<Vec<EdgeId>>,
}

impl CoreGraph {
    /// The empty graph with no vertices or edges.
    pub fn empty() -> Self {
        CoreGraph {
            vertices: vec![],
            edges: vec![],
            incidence: vec![],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.0 < self.vertices.len()
    }

    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.0]
    }

    /// Source and target of an edge, in insertion order.
    pub fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        let edge = &self.edges[e.0];
        (edge.source, edge.target)
    }

    pub fn vertex_membership(&self, v: VertexId) -> Membership {
        self.vertices[v.0]
    }

    pub fn edge_membership(&self, e: EdgeId) -> Membership {
        self.edges[e.0].membership
    }

    /// Edges incident to `v`.
    pub fn incident_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.incidence[v.0]
    }

    /// The edge between `u` and `v`, in either orientation.
    pub fn find_edge(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.find_edge_by(u, v, |_| true)
    }

    /// The first edge between `u` and `v` whose membership satisfies `pred`.
    pub fn find_edge_by<F>(&self, u: VertexId, v: VertexId, pred: F) -> Option<EdgeId>
    where
        F: Fn(Membership) -> bool,
    {
        self.incidence[u.0].iter().copied().find(|e| {
            let edge = &self.edges[e.0];
            edge.joins(u, v) && pred(edge.membership)
        })
    }

    /// Add a single vertex tagged `m` to the [`CoreGraph`]
    pub fn new_vertex(&mut self, m: Membership) -> VertexId {
        let index = self.vertices.len();
        self.vertices.push(m);
        self.incidence.push(vec![]);
        VertexId(index)
    }

    /// Add an edge tagged `m` between `source` and `target`.
    ///
    /// Returns `None` without modifying the graph if the edge would be a self-loop or parallel to
    /// an existing edge. Panics if either endpoint is not a vertex of the graph.
    pub fn new_edge(&mut self, source: VertexId, target: VertexId, m: Membership) -> Option<EdgeId> {
        assert!(
            self.contains_vertex(source) && self.contains_vertex(target),
            "edge endpoint out of range: ({}, {}) with {} vertices",
            source.0,
            target.0,
            self.vertices.len()
        );
        if source == target || self.find_edge(source, target).is_some() {
            return None;
        }
        let edge_idx = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            membership: m,
        });
        self.incidence[source.0].push(EdgeId(edge_idx));
        self.incidence[target.0].push(EdgeId(edge_idx));
        Some(EdgeId(edge_idx))
    }

    /// Does every vertex list exactly the edges incident to it, in insertion order?
    ///
    /// Always true for graphs built with [`CoreGraph::new_edge`]; a deserialized graph may not be.
    pub(crate) fn incidence_consistent(&self) -> bool {
        if self.incidence.len() != self.vertices.len() {
            return false;
        }
        let mut expected = vec![Vec::new(); self.vertices.len()];
        for (i, edge) in self.edges.iter().enumerate() {
            for v in [edge.source, edge.target] {
                match expected.get_mut(v.0) {
                    Some(incident) => incident.push(EdgeId(i)),
                    None => return false,
                }
            }
        }
        expected == self.incidence
    }

    pub(crate) fn set_vertex_membership(&mut self, v: VertexId, m: Membership) {
        self.vertices[v.0] = m;
    }

    pub(crate) fn set_edge_membership(&mut self, e: EdgeId, m: Membership) {
        self.edges[e.0].membership = m;
    }
}
