//! Sequential composition of rules along a [`Match`](crate::matching::Match).
//!
//! Given rules `p₁ = (L₁ ⊇ K₁ ⊆ R₁)` and `p₂ = (L₂ ⊇ K₂ ⊆ R₂)` and a correspondence between
//! vertices of `R₁` and `L₂`, [`compose`] builds a single rule with the effect of applying `p₁`
//! and then `p₂`, or returns `None` if the two cannot be glued consistently along the match.
//!
//! The result is built in four passes over the core graphs:
//!
//! 1. copy the vertices of the first rule, dropping those created by `p₁` and deleted by `p₂`,
//! 2. add the vertices of the second rule, merging matched ones,
//! 3. copy the edges of the first rule which the second rule does not account for,
//! 4. add or merge the edges of the second rule.
//!
//! Each pass checks the membership of the elements it glues, so the result never contains a
//! dangling edge or two edges between the same pair of vertices.
mod engine;

pub use engine::*;
