//! Hooks through which the composition engine hands payload data to domain code.
//!
//! The engine only decides the structure of a composed rule. Everything attached to vertices and
//! edges (labels, charges, terms, ...) is transported by a [`Visitor`], which is called at fixed
//! points of the algorithm with the origin and destination of each element.
use crate::compose::Composition;
use crate::graph::{EdgeId, VertexId};
use crate::matching::Match;
use crate::rule::Rule;

/// The read-only inputs of a composition.
#[derive(Debug, Clone, Copy)]
pub struct VisitContext<'a> {
    pub first: &'a Rule,
    pub second: &'a Rule,
    pub matching: &'a Match,
}

/// Callbacks invoked by [`crate::compose::compose`].
///
/// Every method has a default which does nothing, so implementors only override the hooks they
/// need. Only [`Visitor::init`] and [`Visitor::finalize`] can influence the outcome: returning
/// `false` from either rejects the composition.
///
/// The `result` argument is the composition under construction. Its forward maps are filled in
/// incrementally, so a callback sees every element placed before it.
#[allow(unused_variables)]
pub trait Visitor {
    /// Called before any element is created.
    fn init(&mut self, ctx: &VisitContext<'_>, result: &Composition) -> bool {
        true
    }

    /// Called after all structural work, with the complete result graph.
    fn finalize(&mut self, ctx: &VisitContext<'_>, result: &Composition) -> bool {
        true
    }

    fn copy_vertex_first(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_first: VertexId,
        v_result: VertexId,
    ) {
    }

    fn copy_vertex_second(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_second: VertexId,
        v_result: VertexId,
    ) {
    }

    fn copy_edge_first(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_first: EdgeId,
        e_result: EdgeId,
    ) {
    }

    fn copy_edge_second(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_second: EdgeId,
        e_result: EdgeId,
    ) {
    }

    /// A vertex created by the first rule is matched to a vertex the second rule keeps.
    fn compose_vertex_r_vs_lr(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
    }

    /// A vertex kept by the first rule is matched to a vertex the second rule deletes.
    ///
    /// Called before the result vertex is retagged `Left`.
    fn compose_vertex_lr_vs_l(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
    }

    /// A vertex kept by the first rule is matched to a vertex the second rule keeps.
    fn compose_vertex_lr_vs_lr(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
    }

    /// An edge of the result has been promoted to `Context`; its right-hand payload comes from
    /// `e_second`.
    fn set_edge_result_right_from_second_right(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_result: EdgeId,
        e_second: EdgeId,
    ) {
    }
}

/// The visitor which transports nothing.
impl Visitor for () {}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn init(&mut self, ctx: &VisitContext<'_>, result: &Composition) -> bool {
        (**self).init(ctx, result)
    }

    fn finalize(&mut self, ctx: &VisitContext<'_>, result: &Composition) -> bool {
        (**self).finalize(ctx, result)
    }

    fn copy_vertex_first(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_first: VertexId,
        v_result: VertexId,
    ) {
        (**self).copy_vertex_first(ctx, result, v_first, v_result)
    }

    fn copy_vertex_second(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_second: VertexId,
        v_result: VertexId,
    ) {
        (**self).copy_vertex_second(ctx, result, v_second, v_result)
    }

    fn copy_edge_first(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_first: EdgeId,
        e_result: EdgeId,
    ) {
        (**self).copy_edge_first(ctx, result, e_first, e_result)
    }

    fn copy_edge_second(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_second: EdgeId,
        e_result: EdgeId,
    ) {
        (**self).copy_edge_second(ctx, result, e_second, e_result)
    }

    fn compose_vertex_r_vs_lr(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        (**self).compose_vertex_r_vs_lr(ctx, result, v_result, v_second)
    }

    fn compose_vertex_lr_vs_l(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        (**self).compose_vertex_lr_vs_l(ctx, result, v_result, v_second)
    }

    fn compose_vertex_lr_vs_lr(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        (**self).compose_vertex_lr_vs_lr(ctx, result, v_result, v_second)
    }

    fn set_edge_result_right_from_second_right(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_result: EdgeId,
        e_second: EdgeId,
    ) {
        (**self).set_edge_result_right_from_second_right(ctx, result, e_result, e_second)
    }
}

/// Run two visitors in sequence.
///
/// `init` and `finalize` stop at the first visitor which rejects.
impl<A: Visitor, B: Visitor> Visitor for (A, B) {
    fn init(&mut self, ctx: &VisitContext<'_>, result: &Composition) -> bool {
        self.0.init(ctx, result) && self.1.init(ctx, result)
    }

    fn finalize(&mut self, ctx: &VisitContext<'_>, result: &Composition) -> bool {
        self.0.finalize(ctx, result) && self.1.finalize(ctx, result)
    }

    fn copy_vertex_first(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_first: VertexId,
        v_result: VertexId,
    ) {
        self.0.copy_vertex_first(ctx, result, v_first, v_result);
        self.1.copy_vertex_first(ctx, result, v_first, v_result);
    }

    fn copy_vertex_second(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_second: VertexId,
        v_result: VertexId,
    ) {
        self.0.copy_vertex_second(ctx, result, v_second, v_result);
        self.1.copy_vertex_second(ctx, result, v_second, v_result);
    }

    fn copy_edge_first(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_first: EdgeId,
        e_result: EdgeId,
    ) {
        self.0.copy_edge_first(ctx, result, e_first, e_result);
        self.1.copy_edge_first(ctx, result, e_first, e_result);
    }

    fn copy_edge_second(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_second: EdgeId,
        e_result: EdgeId,
    ) {
        self.0.copy_edge_second(ctx, result, e_second, e_result);
        self.1.copy_edge_second(ctx, result, e_second, e_result);
    }

    fn compose_vertex_r_vs_lr(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        self.0.compose_vertex_r_vs_lr(ctx, result, v_result, v_second);
        self.1.compose_vertex_r_vs_lr(ctx, result, v_result, v_second);
    }

    fn compose_vertex_lr_vs_l(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        self.0.compose_vertex_lr_vs_l(ctx, result, v_result, v_second);
        self.1.compose_vertex_lr_vs_l(ctx, result, v_result, v_second);
    }

    fn compose_vertex_lr_vs_lr(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        v_result: VertexId,
        v_second: VertexId,
    ) {
        self.0.compose_vertex_lr_vs_lr(ctx, result, v_result, v_second);
        self.1.compose_vertex_lr_vs_lr(ctx, result, v_result, v_second);
    }

    fn set_edge_result_right_from_second_right(
        &mut self,
        ctx: &VisitContext<'_>,
        result: &Composition,
        e_result: EdgeId,
        e_second: EdgeId,
    ) {
        self.0
            .set_edge_result_right_from_second_right(ctx, result, e_result, e_second);
        self.1
            .set_edge_result_right_from_second_right(ctx, result, e_result, e_second);
    }
}
