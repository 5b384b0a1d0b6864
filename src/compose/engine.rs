use crate::graph::{CoreGraph, EdgeId, VertexId};
use crate::matching::Match;
use crate::membership::Membership;
use crate::rule::Rule;
use crate::trace::{ComposeEvent, ComposeTrace, FailureReason, Phase, NOOP_TRACE};
use crate::visitor::{VisitContext, Visitor};

/// A composed rule together with the maps recording where each input element landed.
///
/// A map entry of `None` means the element has no counterpart in the result: the vertex was
/// created by the first rule and deleted by the second, or the edge was absorbed by the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    rule: Rule,
    first_to_result_vertex: Vec<Option<VertexId>>,
    second_to_result_vertex: Vec<Option<VertexId>>,
    first_to_result_edge: Vec<Option<EdgeId>>,
    second_to_result_edge: Vec<Option<EdgeId>>,
}

impl Composition {
    fn new(first: &Rule, second: &Rule) -> Self {
        Composition {
            rule: Rule::empty(),
            first_to_result_vertex: vec![None; first.vertex_count()],
            second_to_result_vertex: vec![None; second.vertex_count()],
            first_to_result_edge: vec![None; first.edge_count()],
            second_to_result_edge: vec![None; second.edge_count()],
        }
    }

    /// The composed rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The composed rule, dropping the forward maps.
    pub fn into_rule(self) -> Rule {
        self.rule
    }

    /// Where a vertex of the first rule landed.
    ///
    /// `None` if the vertex was created by the first rule and deleted by the second, so has no
    /// counterpart in the result. Panics if `v_first` is not a vertex of the first rule.
    pub fn first_to_result_vertex(&self, v_first: VertexId) -> Option<VertexId> {
        self.first_to_result_vertex[v_first.0]
    }

    /// Where a vertex of the second rule landed; matched vertices share the result vertex of
    /// their partner in the first rule.
    ///
    /// `None` exactly when its partner was deleted. Panics if `v_second` is not a vertex of the
    /// second rule.
    pub fn second_to_result_vertex(&self, v_second: VertexId) -> Option<VertexId> {
        self.second_to_result_vertex[v_second.0]
    }

    /// Where an edge of the first rule landed.
    ///
    /// `None` if the edge was created by the first rule and matched by an edge the second rule
    /// deletes or keeps; a kept one lands through [`Composition::second_to_result_edge`]. Panics if
    /// `e_first` is not an edge of the first rule.
    pub fn first_to_result_edge(&self, e_first: EdgeId) -> Option<EdgeId> {
        self.first_to_result_edge[e_first.0]
    }

    /// Where an edge of the second rule landed.
    ///
    /// An edge identified with an edge of the first rule shares its result edge. `None` if it
    /// deletes an edge the first rule created. Panics if `e_second` is not an edge of the
    /// second rule.
    pub fn second_to_result_edge(&self, e_second: EdgeId) -> Option<EdgeId> {
        self.second_to_result_edge[e_second.0]
    }

    fn graph(&self) -> &CoreGraph {
        self.rule.graph()
    }
}

/// Compose `first` then `second` along `matching`.
///
/// Returns `None` if the composition is not defined for this match, or if the visitor rejected it.
///
/// # Panics
///
/// If `matching` is inconsistent with the rules it is used with, e.g. if it identifies a vertex
/// deleted by the first rule. Matches built with [`Match::push`] for these rules never are.
pub fn compose<V: Visitor>(
    first: &Rule,
    second: &Rule,
    matching: &Match,
    visitor: V,
) -> Option<Composition> {
    compose_traced(first, second, matching, visitor, None)
}

/// Like [`compose`], reporting every step of the algorithm to `trace`.
pub fn compose_traced<V: Visitor>(
    first: &Rule,
    second: &Rule,
    matching: &Match,
    visitor: V,
    trace: Option<&dyn ComposeTrace>,
) -> Option<Composition> {
    let trace = trace.unwrap_or(&NOOP_TRACE);
    let composer = Composer {
        ctx: VisitContext {
            first,
            second,
            matching,
        },
        visitor,
        trace,
        result: Composition::new(first, second),
        phase: Phase::Init,
    };
    composer.run()
}

/// Compose `first` then `second` along each of `matches` in turn.
///
/// A fresh visitor is made for every match. Returns the successful compositions in the order of
/// their matches.
pub fn compose_all<'m, V, F>(
    first: &Rule,
    second: &Rule,
    matches: impl IntoIterator<Item = &'m Match>,
    mut make_visitor: F,
) -> Vec<Composition>
where
    V: Visitor,
    F: FnMut() -> V,
{
    matches
        .into_iter()
        .filter_map(|m| compose(first, second, m, make_visitor()))
        .collect()
}

type Step = Result<(), FailureReason>;

struct Composer<'a, V> {
    ctx: VisitContext<'a>,
    visitor: V,
    trace: &'a dyn ComposeTrace,
    result: Composition,
    phase: Phase,
}

impl<V: Visitor> Composer<'_, V> {
    fn run(mut self) -> Option<Composition> {
        match self.phases() {
            Ok(()) => {
                self.trace.on_event(ComposeEvent::Success {
                    vertices: self.result.graph().vertex_count(),
                    edges: self.result.graph().edge_count(),
                });
                Some(self.result)
            }
            Err(reason) => {
                self.trace.on_event(ComposeEvent::Failure {
                    phase: self.phase,
                    reason,
                });
                None
            }
        }
    }

    fn phases(&mut self) -> Step {
        self.enter(Phase::Init);
        if !self.visitor.init(&self.ctx, &self.result) {
            return Err(FailureReason::InitRejected);
        }

        self.enter(Phase::CopyVerticesFirst);
        self.copy_vertices_first();
        self.enter(Phase::ComposeVerticesSecond);
        self.compose_vertices_second();
        self.enter(Phase::CopyEdgesFirst);
        self.copy_edges_first()?;
        self.enter(Phase::ComposeEdgesSecond);
        self.compose_edges_second()?;

        self.enter(Phase::Finalize);
        if !self.visitor.finalize(&self.ctx, &self.result) {
            return Err(FailureReason::FinalizeRejected);
        }
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        log::trace!(target: "dpo_compose", "entering {phase:?}");
        self.phase = phase;
        self.trace.on_event(ComposeEvent::EnterPhase(phase));
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Lookups

    /// The second-rule partner of a vertex of the first rule.
    fn second_of(&self, v_first: VertexId) -> Option<VertexId> {
        self.ctx.matching.lookup_inverse(v_first)
    }

    /// The first-rule partner of a vertex of the second rule.
    ///
    /// Vertices created by the second rule are not in its left side, so are never matched.
    fn first_of(&self, v_second: VertexId) -> Option<VertexId> {
        if self.ctx.second.membership(v_second) == Membership::Right {
            return None;
        }
        self.ctx.matching.lookup(v_second)
    }

    fn result_membership(&self, v_result: VertexId) -> Membership {
        self.result.graph().vertex_membership(v_result)
    }

    fn add_result_edge(&mut self, s: VertexId, t: VertexId, m: Membership) -> EdgeId {
        match self.result.rule.graph_mut().new_edge(s, t, m) {
            Some(e) => e,
            None => panic!(
                "composition invariant violated: parallel edge between result vertices {} and {}",
                s.0, t.0
            ),
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Vertices

    fn copy_vertices_first(&mut self) {
        let first = self.ctx.first;
        let second = self.ctx.second;
        for v_first in first.vertices() {
            let m = first.membership(v_first);
            // created by the first rule and immediately consumed by the second
            let consumed = match self.second_of(v_first) {
                Some(v_second) if m == Membership::Right => {
                    (second.membership(v_second) == Membership::Left).then_some(v_second)
                }
                _ => None,
            };
            if let Some(v_second) = consumed {
                self.trace.on_event(ComposeEvent::VertexDeleted {
                    first: v_first,
                    second: v_second,
                });
                continue;
            }

            let v_result = self.result.rule.graph_mut().new_vertex(m);
            self.result.first_to_result_vertex[v_first.0] = Some(v_result);
            self.visitor
                .copy_vertex_first(&self.ctx, &self.result, v_first, v_result);
            self.trace.on_event(ComposeEvent::VertexCopied {
                from_first: true,
                vertex: v_first,
                result: v_result,
                membership: m,
            });
        }
    }

    fn compose_vertices_second(&mut self) {
        let first = self.ctx.first;
        let second = self.ctx.second;
        for v_second in second.vertices() {
            let m_second = second.membership(v_second);
            let Some(v_first) = self.first_of(v_second) else {
                let v_result = self.result.rule.graph_mut().new_vertex(m_second);
                self.result.second_to_result_vertex[v_second.0] = Some(v_result);
                self.visitor
                    .copy_vertex_second(&self.ctx, &self.result, v_second, v_result);
                self.trace.on_event(ComposeEvent::VertexCopied {
                    from_first: false,
                    vertex: v_second,
                    result: v_result,
                    membership: m_second,
                });
                continue;
            };

            let Some(v_result) = self.result.first_to_result_vertex[v_first.0] else {
                // only a vertex created by the first rule and deleted by the second is dropped
                let m_first = first.membership(v_first);
                if m_first != Membership::Right || m_second != Membership::Left {
                    panic!(
                        "composition invariant violated: first vertex {} ({m_first}) was dropped \
                         but is matched to second vertex {} ({m_second})",
                        v_first.0, v_second.0
                    );
                }
                continue;
            };
            self.result.second_to_result_vertex[v_second.0] = Some(v_result);

            let m_first = self.result_membership(v_result);
            let m_result = match (m_first, m_second) {
                (Membership::Left, _) => panic!(
                    "composition invariant violated: matched first vertex {} is not in the right side",
                    v_first.0
                ),
                (Membership::Right, Membership::Left) => panic!(
                    "composition invariant violated: first vertex {} is created and deleted \
                     but was not dropped",
                    v_first.0
                ),
                (Membership::Right, Membership::Context | Membership::Right) => {
                    self.visitor
                        .compose_vertex_r_vs_lr(&self.ctx, &self.result, v_result, v_second);
                    Membership::Right
                }
                (Membership::Context, Membership::Left) => {
                    self.visitor
                        .compose_vertex_lr_vs_l(&self.ctx, &self.result, v_result, v_second);
                    self.result
                        .rule
                        .graph_mut()
                        .set_vertex_membership(v_result, Membership::Left);
                    Membership::Left
                }
                (Membership::Context, Membership::Context | Membership::Right) => {
                    self.visitor
                        .compose_vertex_lr_vs_lr(&self.ctx, &self.result, v_result, v_second);
                    Membership::Context
                }
            };
            self.trace.on_event(ComposeEvent::VertexComposed {
                second: v_second,
                result: v_result,
                membership: m_result,
            });
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Edges

    fn copy_edges_first(&mut self) -> Step {
        let first = self.ctx.first;
        let second = self.ctx.second;
        for e_first in first.edges() {
            let (s_first, t_first) = first.endpoints(e_first);
            let me_first = first.edge_membership(e_first);

            // deleted by the first rule, so the second rule cannot see it
            if me_first == Membership::Left {
                self.copy_edge_first(e_first, me_first);
                continue;
            }

            match (self.second_of(s_first), self.second_of(t_first)) {
                (Some(s_second), Some(t_second)) => {
                    let e_second = second.graph().find_edge_by(s_second, t_second, |m| {
                        m != Membership::Right
                    });
                    if let Some(e_second) = e_second {
                        if me_first == Membership::Right {
                            // handled when composing the edges of the second rule
                            self.trace.on_event(ComposeEvent::EdgeSkipped {
                                from_first: true,
                                edge: e_first,
                            });
                        } else {
                            // what happens to a kept edge is decided by the second rule
                            self.copy_edge_first(e_first, second.edge_membership(e_second));
                        }
                        continue;
                    }

                    // the edge survives the second rule, so its ends must too
                    self.check_first_endpoint(s_first, me_first)?;
                    self.check_first_endpoint(t_first, me_first)?;
                }
                (Some(_), None) => self.check_first_endpoint(s_first, me_first)?,
                (None, Some(_)) => self.check_first_endpoint(t_first, me_first)?,
                (None, None) => {}
            }
            self.copy_edge_first(e_first, me_first);
        }
        Ok(())
    }

    /// A matched endpoint of a surviving edge of the first rule must survive the second rule.
    fn check_first_endpoint(&self, v_first: VertexId, me_first: Membership) -> Step {
        let v_result =
            self.result.first_to_result_vertex[v_first.0].ok_or(FailureReason::EndpointDeleted)?;
        let m = self.result_membership(v_result);
        if m == Membership::Left {
            return Err(FailureReason::InconsistentEndpoint {
                vertex: m,
                edge: me_first,
            });
        }
        Ok(())
    }

    fn copy_edge_first(&mut self, e_first: EdgeId, m: Membership) {
        let (s_first, t_first) = self.ctx.first.endpoints(e_first);
        let (Some(s), Some(t)) = (
            self.result.first_to_result_vertex[s_first.0],
            self.result.first_to_result_vertex[t_first.0],
        ) else {
            panic!(
                "composition invariant violated: edge {} of the first rule lost an endpoint",
                e_first.0
            );
        };
        let e_result = self.add_result_edge(s, t, m);
        self.result.first_to_result_edge[e_first.0] = Some(e_result);
        self.visitor
            .copy_edge_first(&self.ctx, &self.result, e_first, e_result);
        self.trace.on_event(ComposeEvent::EdgeCopied {
            from_first: true,
            edge: e_first,
            result: e_result,
            membership: m,
        });
    }

    fn compose_edges_second(&mut self) -> Step {
        let second = self.ctx.second;
        for e_second in second.edges() {
            let (s_second, t_second) = second.endpoints(e_second);
            let me_second = second.edge_membership(e_second);
            match (self.first_of(s_second), self.first_of(t_second)) {
                (None, None) => self.copy_edge_second(e_second, me_second),
                (Some(_), None) => {
                    self.check_second_endpoint(s_second, me_second)?;
                    self.copy_edge_second(e_second, me_second);
                }
                (None, Some(_)) => {
                    self.check_second_endpoint(t_second, me_second)?;
                    self.copy_edge_second(e_second, me_second);
                }
                (Some(s_first), Some(t_first)) => {
                    self.compose_edge_both_matched(e_second, s_first, t_first)?
                }
            }
        }
        Ok(())
    }

    /// The matched endpoint of a new edge must exist on the sides the edge does.
    fn check_second_endpoint(&self, v_second: VertexId, me_second: Membership) -> Step {
        let v_result = self.result.second_to_result_vertex[v_second.0]
            .ok_or(FailureReason::EndpointDeleted)?;
        let m = self.result_membership(v_result);
        if m != Membership::Context && m != me_second {
            return Err(FailureReason::InconsistentEndpoint {
                vertex: m,
                edge: me_second,
            });
        }
        Ok(())
    }

    fn compose_edge_both_matched(
        &mut self,
        e_second: EdgeId,
        s_first: VertexId,
        t_first: VertexId,
    ) -> Step {
        let second = self.ctx.second;
        let (s_second, t_second) = second.endpoints(e_second);
        let me_second = second.edge_membership(e_second);

        let Some(e_first) = self.ctx.first.find_edge(s_first, t_first) else {
            // a new edge: its ends must exist on every side the edge does
            for v_second in [s_second, t_second] {
                let v_result = self.result.second_to_result_vertex[v_second.0]
                    .ok_or(FailureReason::EndpointDeleted)?;
                let m = self.result_membership(v_result);
                if !me_second.edge_compatible_with(m) {
                    return Err(match me_second {
                        Membership::Left => FailureReason::LeftEdgeOnCreatedVertex,
                        _ => FailureReason::InconsistentEndpoint {
                            vertex: m,
                            edge: me_second,
                        },
                    });
                }
            }
            self.copy_edge_second(e_second, me_second);
            return Ok(());
        };
        let me_first = self.ctx.first.edge_membership(e_first);

        match (me_first, me_second) {
            (Membership::Left, Membership::Left | Membership::Context) => {
                Err(FailureReason::ParallelEdgeInLeft)
            }
            (Membership::Context | Membership::Right, Membership::Right) => {
                Err(FailureReason::ParallelEdgeInRight)
            }
            (Membership::Context | Membership::Right, Membership::Left) => {
                // matched and deleted: already written as Left, or never written at all
                self.result.second_to_result_edge[e_second.0] =
                    self.result.first_to_result_edge[e_first.0];
                self.trace.on_event(ComposeEvent::EdgeSkipped {
                    from_first: false,
                    edge: e_second,
                });
                Ok(())
            }
            (Membership::Right, Membership::Context) => {
                self.copy_edge_second(e_second, Membership::Right);
                Ok(())
            }
            (Membership::Left, Membership::Right) | (Membership::Context, Membership::Context) => {
                let Some(e_result) = self.result.first_to_result_edge[e_first.0] else {
                    panic!(
                        "composition invariant violated: edge {} of the first rule was not copied",
                        e_first.0
                    );
                };
                self.result
                    .rule
                    .graph_mut()
                    .set_edge_membership(e_result, Membership::Context);
                self.result.second_to_result_edge[e_second.0] = Some(e_result);
                self.visitor.set_edge_result_right_from_second_right(
                    &self.ctx,
                    &self.result,
                    e_result,
                    e_second,
                );
                self.trace.on_event(ComposeEvent::EdgePromoted {
                    second: e_second,
                    result: e_result,
                });
                Ok(())
            }
        }
    }

    fn copy_edge_second(&mut self, e_second: EdgeId, m: Membership) {
        let (s_second, t_second) = self.ctx.second.endpoints(e_second);
        let (Some(s), Some(t)) = (
            self.result.second_to_result_vertex[s_second.0],
            self.result.second_to_result_vertex[t_second.0],
        ) else {
            panic!(
                "composition invariant violated: edge {} of the second rule lost an endpoint",
                e_second.0
            );
        };
        let e_result = self.add_result_edge(s, t, m);
        self.result.second_to_result_edge[e_second.0] = Some(e_result);
        self.visitor
            .copy_edge_second(&self.ctx, &self.result, e_second, e_result);
        self.trace.on_event(ComposeEvent::EdgeCopied {
            from_first: false,
            edge: e_second,
            result: e_result,
            membership: m,
        });
    }
}
