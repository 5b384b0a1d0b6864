//! Rules in the single-graph ("core graph") representation.
use thiserror::Error;

use crate::graph::{CoreGraph, EdgeId, VertexId};
use crate::membership::Membership;
use crate::side::{Projection, Side};

/// Errors raised while building a [`Rule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// An edge endpoint does not name a vertex of the rule
    #[error("vertex {0:?} does not exist")]
    UnknownVertex(VertexId),
    /// Both endpoints of an edge are the same vertex
    #[error("self-loop on vertex {0:?}")]
    SelfLoop(VertexId),
    /// There already is an edge between the two vertices
    #[error("parallel edge between {0:?} and {1:?}")]
    ParallelEdge(VertexId, VertexId),
    /// The edge exists on a side where one of its endpoints does not
    #[error("{edge} edge is incident to {endpoint} vertex {vertex:?}")]
    IncompatibleEdge {
        /// Membership of the rejected edge
        edge: Membership,
        /// Membership of the offending endpoint
        endpoint: Membership,
        /// The offending endpoint
        vertex: VertexId,
    },
    /// The incidence lists of the core graph disagree with its edges
    #[error("incidence lists do not match the edges of the graph")]
    InconsistentIncidence,
}

/// A DPO rule `L ⊇ K ⊆ R` stored as one graph whose elements are tagged with a [`Membership`].
///
/// A `Rule` can only be obtained from a [`RuleBuilder`] (or by composition), so it always
/// satisfies its invariants: no self-loops, no parallel edges, and every edge exists only on sides
/// where both of its endpoints exist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    graph: CoreGraph,
}

impl Rule {
    /// The empty rule, which does nothing.
    pub fn empty() -> Self {
        Rule {
            graph: CoreGraph::empty(),
        }
    }

    pub(crate) fn graph_mut(&mut self) -> &mut CoreGraph {
        &mut self.graph
    }

    /// The core graph of the rule.
    pub fn graph(&self) -> &CoreGraph {
        &self.graph
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> {
        self.graph.vertices()
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeId> {
        self.graph.edges()
    }

    pub fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        self.graph.endpoints(e)
    }

    pub fn find_edge(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.graph.find_edge(u, v)
    }

    pub fn membership(&self, v: VertexId) -> Membership {
        self.graph.vertex_membership(v)
    }

    pub fn edge_membership(&self, e: EdgeId) -> Membership {
        self.graph.edge_membership(e)
    }

    /// The graph `L` the rule matches against.
    pub fn left_side(&self) -> Projection<'_> {
        Projection::new(&self.graph, Side::Left)
    }

    /// The graph `R` the rule produces.
    pub fn right_side(&self) -> Projection<'_> {
        Projection::new(&self.graph, Side::Right)
    }

    /// The reverse rule `R ⊇ K ⊆ L`.
    pub fn inverse(&self) -> Rule {
        let mut graph = self.graph.clone();
        for v in self.vertices() {
            graph.set_vertex_membership(v, self.membership(v).inverse());
        }
        for e in self.edges() {
            graph.set_edge_membership(e, self.edge_membership(e).inverse());
        }
        Rule { graph }
    }

    /// Check the invariants of the rule, returning the first violation found.
    ///
    /// This always succeeds for rules built through the public API; it is useful after
    /// deserialization.
    pub fn validate(&self) -> Result<(), RuleError> {
        for e in self.edges() {
            let (s, t) = self.endpoints(e);
            check_edge(&self.graph, s, t, self.edge_membership(e))?;
        }
        // edge lookups below go through the incidence lists
        if !self.graph.incidence_consistent() {
            return Err(RuleError::InconsistentIncidence);
        }
        for e in self.edges() {
            let (s, t) = self.endpoints(e);
            if self.graph.find_edge(s, t) != Some(e) {
                return Err(RuleError::ParallelEdge(s, t));
            }
        }
        Ok(())
    }
}

fn check_edge(g: &CoreGraph, s: VertexId, t: VertexId, m: Membership) -> Result<(), RuleError> {
    for v in [s, t] {
        if !g.contains_vertex(v) {
            return Err(RuleError::UnknownVertex(v));
        }
    }
    if s == t {
        return Err(RuleError::SelfLoop(s));
    }
    for v in [s, t] {
        let endpoint = g.vertex_membership(v);
        if !m.edge_compatible_with(endpoint) {
            return Err(RuleError::IncompatibleEdge {
                edge: m,
                endpoint,
                vertex: v,
            });
        }
    }
    Ok(())
}

/// A stateful builder for [`Rule`]s.
///
/// ```rust
/// use dpo_compose::prelude::*;
///
/// // a rule deleting the edge between two kept vertices
/// let mut b = RuleBuilder::new();
/// let x = b.add_vertex(Membership::Context);
/// let y = b.add_vertex(Membership::Context);
/// b.add_edge(x, y, Membership::Left).unwrap();
/// let rule = b.build();
///
/// assert_eq!(rule.left_side().edge_count(), 1);
/// assert_eq!(rule.right_side().edge_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    graph: CoreGraph,
}

impl RuleBuilder {
    pub fn new() -> Self {
        RuleBuilder {
            graph: CoreGraph::empty(),
        }
    }

    pub fn add_vertex(&mut self, m: Membership) -> VertexId {
        self.graph.new_vertex(m)
    }

    /// Add an edge, checking it against the vertices already present.
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        m: Membership,
    ) -> Result<EdgeId, RuleError> {
        check_edge(&self.graph, source, target, m)?;
        self.graph
            .new_edge(source, target, m)
            .ok_or(RuleError::ParallelEdge(source, target))
    }

    pub fn build(self) -> Rule {
        Rule { graph: self.graph }
    }
}
