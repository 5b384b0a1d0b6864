//! Rules whose elements carry labels, and a [`Visitor`] transporting them through composition.
//!
//! This is the simplest useful payload: every element has a label on each side it exists on, and
//! a `Context` element may be relabelled by the rule.
use thiserror::Error;

use crate::compose::{compose, Composition};
use crate::graph::{EdgeId, VertexId};
use crate::matching::Match;
use crate::membership::Membership;
use crate::rule::{Rule, RuleBuilder, RuleError};
use crate::visitor::{VisitContext, Visitor};

/// The labels of one element, one per side the element exists on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Labels<L> {
    Left(L),
    Context(L, L),
    Right(L),
}

impl<L> Labels<L> {
    /// An element kept unchanged by the rule.
    pub fn keep(label: L) -> Self
    where
        L: Clone,
    {
        Labels::Context(label.clone(), label)
    }

    pub fn membership(&self) -> Membership {
        match self {
            Labels::Left(_) => Membership::Left,
            Labels::Context(_, _) => Membership::Context,
            Labels::Right(_) => Membership::Right,
        }
    }

    pub fn left(&self) -> Option<&L> {
        match self {
            Labels::Left(l) | Labels::Context(l, _) => Some(l),
            Labels::Right(_) => None,
        }
    }

    pub fn right(&self) -> Option<&L> {
        match self {
            Labels::Right(r) | Labels::Context(_, r) => Some(r),
            Labels::Left(_) => None,
        }
    }
}

impl<L: Clone> Labels<L> {
    /// Restrict or extend these labels to an element tagged `m`, taking each side's label from
    /// `self`. Returns `None` if `self` has no label for a side `m` needs.
    fn reshape(&self, m: Membership) -> Option<Self> {
        Some(match m {
            Membership::Left => Labels::Left(self.left()?.clone()),
            Membership::Context => Labels::Context(self.left()?.clone(), self.right()?.clone()),
            Membership::Right => Labels::Right(self.right()?.clone()),
        })
    }

    /// Replace the right-hand label, making the element exist on the right side.
    fn with_right(&self, right: L) -> Self {
        match self {
            Labels::Left(l) | Labels::Context(l, _) => Labels::Context(l.clone(), right),
            Labels::Right(_) => Labels::Right(right),
        }
    }
}

/// Ways in which the labels of a [`LabelledRule`] can disagree with its rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("{labels} vertex labels for {vertices} vertices")]
    VertexCount { labels: usize, vertices: usize },
    #[error("{labels} edge labels for {edges} edges")]
    EdgeCount { labels: usize, edges: usize },
    /// The shape of the labels does not fit the membership of the vertex
    #[error("{labels} labels on {membership} vertex {vertex:?}")]
    VertexMembership {
        vertex: VertexId,
        labels: Membership,
        membership: Membership,
    },
    /// The shape of the labels does not fit the membership of the edge
    #[error("{labels} labels on {membership} edge {edge:?}")]
    EdgeMembership {
        edge: EdgeId,
        labels: Membership,
        membership: Membership,
    },
}

/// A [`Rule`] with [`Labels`] on every vertex and edge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelledRule<L> {
    rule: Rule,
    vertex_labels: Vec<Labels<L>>,
    edge_labels: Vec<Labels<L>>,
}

impl<L> LabelledRule<L> {
    pub fn builder() -> LabelledRuleBuilder<L> {
        LabelledRuleBuilder {
            builder: RuleBuilder::new(),
            vertex_labels: vec![],
            edge_labels: vec![],
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Panics if `v` is not a vertex of the rule.
    pub fn vertex_labels(&self, v: VertexId) -> &Labels<L> {
        &self.vertex_labels[v.0]
    }

    /// Panics if `e` is not an edge of the rule.
    pub fn edge_labels(&self, e: EdgeId) -> &Labels<L> {
        &self.edge_labels[e.0]
    }

    /// Check the rule, then that every element has exactly one set of labels shaped like its
    /// membership.
    ///
    /// Rules from [`LabelledRuleBuilder`] always pass; deserialized ones need not.
    pub fn validate(&self) -> Result<(), LabelError> {
        self.rule.validate()?;
        if self.vertex_labels.len() != self.rule.vertex_count() {
            return Err(LabelError::VertexCount {
                labels: self.vertex_labels.len(),
                vertices: self.rule.vertex_count(),
            });
        }
        if self.edge_labels.len() != self.rule.edge_count() {
            return Err(LabelError::EdgeCount {
                labels: self.edge_labels.len(),
                edges: self.rule.edge_count(),
            });
        }
        for v in self.rule.vertices() {
            let labels = self.vertex_labels[v.0].membership();
            let membership = self.rule.membership(v);
            if labels != membership {
                return Err(LabelError::VertexMembership {
                    vertex: v,
                    labels,
                    membership,
                });
            }
        }
        for e in self.rule.edges() {
            let labels = self.edge_labels[e.0].membership();
            let membership = self.rule.edge_membership(e);
            if labels != membership {
                return Err(LabelError::EdgeMembership {
                    edge: e,
                    labels,
                    membership,
                });
            }
        }
        Ok(())
    }
}

/// Builds a [`LabelledRule`]; the membership of each element follows from its [`Labels`].
pub struct LabelledRuleBuilder<L> {
    builder: RuleBuilder,
    vertex_labels: Vec<Labels<L>>,
    edge_labels: Vec<Labels<L>>,
}

impl<L> LabelledRuleBuilder<L> {
    pub fn add_vertex(&mut self, labels: Labels<L>) -> VertexId {
        let v = self.builder.add_vertex(labels.membership());
        self.vertex_labels.push(labels);
        v
    }

    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        labels: Labels<L>,
    ) -> Result<EdgeId, RuleError> {
        let e = self.builder.add_edge(source, target, labels.membership())?;
        self.edge_labels.push(labels);
        Ok(e)
    }

    pub fn build(self) -> LabelledRule<L> {
        LabelledRule {
            rule: self.builder.build(),
            vertex_labels: self.vertex_labels,
            edge_labels: self.edge_labels,
        }
    }
}

/// Transports [`Labels`] from two [`LabelledRule`]s into their composition.
///
/// Matched elements must agree: the right label in the first rule must equal the left label in the
/// second rule, otherwise `init` rejects the composition. `init` also rejects rules failing
/// [`LabelledRule::validate`].
///
/// The rules composed must be the ones underlying `first` and `second`.
pub struct LabelVisitor<'a, L> {
    first: &'a LabelledRule<L>,
    second: &'a LabelledRule<L>,
    vertex_labels: Vec<Option<Labels<L>>>,
    edge_labels: Vec<Option<Labels<L>>>,
}

impl<'a, L: Clone + PartialEq> LabelVisitor<'a, L> {
    pub fn new(first: &'a LabelledRule<L>, second: &'a LabelledRule<L>) -> Self {
        LabelVisitor {
            first,
            second,
            vertex_labels: vec![],
            edge_labels: vec![],
        }
    }

    /// Attach the collected labels to the composed rule.
    ///
    /// Returns `None` if some element of `composition` did not receive labels, which means this
    /// visitor was not the one used to build it.
    pub fn into_labelled(self, composition: Composition) -> Option<LabelledRule<L>> {
        let rule = composition.into_rule();
        if self.vertex_labels.len() != rule.vertex_count()
            || self.edge_labels.len() != rule.edge_count()
        {
            return None;
        }
        Some(LabelledRule {
            rule,
            vertex_labels: self.vertex_labels.into_iter().collect::<Option<Vec<_>>>()?,
            edge_labels: self.edge_labels.into_iter().collect::<Option<Vec<_>>>()?,
        })
    }

    fn agree(first: &Labels<L>, second: &Labels<L>) -> bool {
        first.right() == second.left()
    }
}

fn put<T>(table: &mut Vec<Option<T>>, index: usize, value: Option<T>) {
    if table.len() <= index {
        table.resize_with(index + 1, || None);
    }
    table[index] = value;
}

impl<L: Clone + PartialEq> Visitor for LabelVisitor<'_, L> {
    fn init(&mut self, ctx: &VisitContext<'_>, _result: &Composition) -> bool {
        if let Err(err) = self.first.validate().and_then(|()| self.second.validate()) {
            log::debug!(target: "dpo_compose", "malformed labelled rule: {err}");
            return false;
        }
        for (v_first, v_second) in ctx.matching.iter() {
            if !Self::agree(
                self.first.vertex_labels(v_first),
                self.second.vertex_labels(v_second),
            ) {
                log::debug!(
                    target: "dpo_compose",
                    "labels of {v_first:?} and {v_second:?} disagree"
                );
                return false;
            }
        }
        // edges between matched vertices are identified too
        let left = ctx.second.left_side();
        for e_second in left.edges() {
            let (s, t) = ctx.second.endpoints(e_second);
            let (Some(s_first), Some(t_first)) = (ctx.matching.lookup(s), ctx.matching.lookup(t))
            else {
                continue;
            };
            if let Some(e_first) = ctx.first.right_side().find_edge(s_first, t_first) {
                if !Self::agree(
                    self.first.edge_labels(e_first),
                    self.second.edge_labels(e_second),
                ) {
                    return false;
                }
            }
        }
        true
    }

    fn finalize(&mut self, _ctx: &VisitContext<'_>, result: &Composition) -> bool {
        let g = result.rule().graph();
        let vertices_ok = g.vertices().all(|v| {
            self.vertex_labels.get(v.0).and_then(Option::as_ref).map(Labels::membership)
                == Some(g.vertex_membership(v))
        });
        let edges_ok = g.edges().all(|e| {
            self.edge_labels.get(e.0).and_then(Option::as_ref).map(Labels::membership)
                == Some(g.edge_membership(e))
        });
        vertices_ok && edges_ok
    }

    fn copy_vertex_first(
        &mut self,
        _ctx: &VisitContext<'_>,
        _result: &Composition,
        v_first: VertexId,
        v_result: VertexId,
    ) {
        let labels = self.first.vertex_labels(v_first).clone();
        put(&mut self.vertex_labels, v_result.0, Some(labels));
    }

    fn copy_vertex_second(
        &mut self,
        _ctx: &VisitContext<'_>,
        _result: &Composition,
        v_second: VertexId,
        v_result: VertexId,
    ) {
        let labels = self.second.vertex_labels(v_second).clone();
        put(&mut self.vertex_labels, v_result.0, Some(labels));
    }

    fn copy_edge_first(
        &mut self,
        _ctx: &VisitContext<'_>,
        result: &Composition,
        e_first: EdgeId,
        e_result: EdgeId,
    ) {
        let m = result.rule().edge_membership(e_result);
        let labels = self.first.edge_labels(e_first).reshape(m);
        put(&mut self.edge_labels, e_result.0, labels);
    }

    fn copy_edge_second(
        &mut self,
        _ctx: &VisitContext<'_>,
        result: &Composition,
        e_second: EdgeId,
        e_result: EdgeId,
    ) {
        let m = result.rule().edge_membership(e_result);
        let labels = self.second.edge_labels(e_second).reshape(m);
        put(&mut self.edge_labels, e_result.0, labels);
    }

    fn compose_vertex_r_vs_lr(
        &mut self,
        _ctx: &VisitContext<'_>,
        _result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        // created as a, then relabelled a -> b: created as b
        let labels = self.second.vertex_labels(v_second).right().cloned().map(Labels::Right);
        put(&mut self.vertex_labels, v_result.0, labels);
    }

    fn compose_vertex_lr_vs_l(
        &mut self,
        _ctx: &VisitContext<'_>,
        _result: &Composition,
        v_result: VertexId,
        _v_second: VertexId,
    ) {
        let labels = self.vertex_labels[v_result.0]
            .as_ref()
            .and_then(|l| l.reshape(Membership::Left));
        put(&mut self.vertex_labels, v_result.0, labels);
    }

    fn compose_vertex_lr_vs_lr(
        &mut self,
        _ctx: &VisitContext<'_>,
        _result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        let right = self.second.vertex_labels(v_second).right().cloned();
        let labels = match (&self.vertex_labels[v_result.0], right) {
            (Some(current), Some(right)) => Some(current.with_right(right)),
            _ => None,
        };
        put(&mut self.vertex_labels, v_result.0, labels);
    }

    fn set_edge_result_right_from_second_right(
        &mut self,
        _ctx: &VisitContext<'_>,
        _result: &Composition,
        e_result: EdgeId,
        e_second: EdgeId,
    ) {
        let right = self.second.edge_labels(e_second).right().cloned();
        let labels = match (&self.edge_labels[e_result.0], right) {
            (Some(current), Some(right)) => Some(current.with_right(right)),
            _ => None,
        };
        put(&mut self.edge_labels, e_result.0, labels);
    }
}

/// Compose two labelled rules along `matching`, transporting their labels.
pub fn compose_labelled<L: Clone + PartialEq>(
    first: &LabelledRule<L>,
    second: &LabelledRule<L>,
    matching: &Match,
) -> Option<LabelledRule<L>> {
    let mut visitor = LabelVisitor::new(first, second);
    let composition = compose(first.rule(), second.rule(), matching, &mut visitor)?;
    visitor.into_labelled(composition)
}
