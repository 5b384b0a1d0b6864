use crate::graph::{CoreGraph, EdgeId, VertexId};
use crate::membership::Membership;

/// One of the two graphs a rule relates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The pattern `L`: elements tagged `Left` or `Context`
    Left,
    /// The result `R`: elements tagged `Context` or `Right`
    Right,
}

impl Side {
    pub fn contains(self, m: Membership) -> bool {
        match self {
            Side::Left => m.in_left(),
            Side::Right => m.in_right(),
        }
    }
}

/// A read-only view of one side of a rule.
///
/// The projection holds no data of its own: element ids are those of the underlying
/// [`CoreGraph`], and queries just filter by membership.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    graph: &'a CoreGraph,
    side: Side,
}

impl<'a> Projection<'a> {
    pub fn new(graph: &'a CoreGraph, side: Side) -> Self {
        Projection { graph, side }
    }

    /// Which side this is a view of.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The whole core graph, unfiltered.
    pub fn graph(&self) -> &'a CoreGraph {
        self.graph
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.graph.contains_vertex(v) && self.side.contains(self.graph.vertex_membership(v))
    }

    pub fn contains_edge(&self, e: EdgeId) -> bool {
        e.0 < self.graph.edge_count() && self.side.contains(self.graph.edge_membership(e))
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + 'a {
        let (graph, side) = (self.graph, self.side);
        graph
            .vertices()
            .filter(move |&v| side.contains(graph.vertex_membership(v)))
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + 'a {
        let (graph, side) = (self.graph, self.side);
        graph
            .edges()
            .filter(move |&e| side.contains(graph.edge_membership(e)))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// The edge of this side between `u` and `v`, if any.
    pub fn find_edge(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        let side = self.side;
        self.graph.find_edge_by(u, v, |m| side.contains(m))
    }

    /// Neighbours of `v` on this side.
    pub fn neighbours(&self, v: VertexId) -> impl Iterator<Item = VertexId> + 'a {
        let (graph, side) = (self.graph, self.side);
        graph
            .incident_edges(v)
            .iter()
            .filter(move |&&e| side.contains(graph.edge_membership(e)))
            .map(move |&e| graph.edge(e).opposite(v))
    }
}
