//! # DPO rule composition
//!
//! A [`Rule`](crate::rule::Rule) in the Double-Pushout (DPO) approach to graph
//! rewriting is a span `L ⊇ K ⊆ R`: applying it to a host graph deletes `L \ K`, keeps `K` and
//! creates `R \ K`.
//! This crate stores a rule as a single *core graph* in which every vertex and edge is tagged
//! with a [`Membership`](crate::membership::Membership):
//!
//! ```text
//!     L = { x ─── y }        K = { x   y }        R = { x   y ─── z }
//!
//!     core:   x ═══ y ┈┈┈ z       ═══  Left      (deleted)
//!                                 ┈┈┈  Right     (created)
//!             x, y  Context       z    Right
//! ```
//!
//! The main operation is [`compose`](crate::compose::compose): given rules `p₁`, `p₂` and a
//! [`Match`](crate::matching::Match) identifying vertices of `R₁` with vertices of `L₂`, it
//! builds a rule whose effect is "apply `p₁`, then `p₂`", or reports that no such rule exists
//! for this match.
//!
//! ```rust
//! use dpo_compose::prelude::*;
//!
//! // p₁ deletes the edge x0 - x1
//! let mut b = RuleBuilder::new();
//! let x0 = b.add_vertex(Membership::Context);
//! let x1 = b.add_vertex(Membership::Context);
//! b.add_edge(x0, x1, Membership::Left).unwrap();
//! let first = b.build();
//!
//! // p₂ creates the edge y0 - y1
//! let mut b = RuleBuilder::new();
//! let y0 = b.add_vertex(Membership::Context);
//! let y1 = b.add_vertex(Membership::Context);
//! b.add_edge(y0, y1, Membership::Right).unwrap();
//! let second = b.build();
//!
//! // glue y0 to x0 and y1 to x1
//! let m = Match::from_pairs(&first, &second, [(x0, y0), (x1, y1)]).unwrap();
//!
//! // deleting an edge and adding it back does nothing: the composed edge is kept
//! let result = compose(&first, &second, &m, ()).expect("composable");
//! let e = result.rule().edges().next().unwrap();
//! assert_eq!(result.rule().edge_count(), 1);
//! assert_eq!(result.rule().edge_membership(e), Membership::Context);
//! ```
//!
//! Labels and other data attached to elements are not interpreted by the engine; they are carried
//! over by a [`Visitor`](crate::visitor::Visitor). See [`labelled`] for an example.
//!
//! Compositions are pure functions of their inputs, so many candidate matches can be tried in
//! parallel from different threads.

pub mod graph;
pub mod membership;
pub mod rule;
pub mod side;

pub mod matching;

pub mod compose;
pub mod labelled;
pub mod trace;
pub mod visitor;

pub mod prelude {
    //! The types needed to build and compose rules.
    pub use crate::compose::{compose, compose_all, compose_traced, Composition};
    pub use crate::graph::{CoreGraph, EdgeId, VertexId};
    pub use crate::labelled::{compose_labelled, LabelError, LabelVisitor, LabelledRule, Labels};
    pub use crate::matching::{Match, MatchError};
    pub use crate::membership::Membership;
    pub use crate::rule::{Rule, RuleBuilder, RuleError};
    pub use crate::side::{Projection, Side};
    pub use crate::trace::{ComposeEvent, ComposeTrace, FailureReason, LogTrace, RecordingTrace};
    pub use crate::visitor::{VisitContext, Visitor};
}
