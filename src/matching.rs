//! Vertex correspondences between two rules.
//!
//! A [`Match`] for composing `first` then `second` identifies vertices of the right side `R₁` of
//! the first rule with vertices of the left side `L₂` of the second rule. It models the common
//! subgraph `R₁ ← M → L₂` along which the two rules are glued.
use thiserror::Error;

use crate::graph::VertexId;
use crate::rule::Rule;

/// Reasons a vertex pair cannot be added to a [`Match`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Vertex id out of range for the first rule
    #[error("vertex {0:?} does not exist in the first rule")]
    UnknownFirst(VertexId),
    /// Vertex id out of range for the second rule
    #[error("vertex {0:?} does not exist in the second rule")]
    UnknownSecond(VertexId),
    /// The first-rule vertex is deleted by the first rule
    #[error("vertex {0:?} is not in the right side of the first rule")]
    FirstNotInRight(VertexId),
    /// The second-rule vertex is created by the second rule
    #[error("vertex {0:?} is not in the left side of the second rule")]
    SecondNotInLeft(VertexId),
    /// The first-rule vertex already has a partner
    #[error("first vertex {first:?} already mapped to {second:?}")]
    FirstAlreadyMapped {
        /// The vertex being pushed
        first: VertexId,
        /// Its existing partner in the second rule
        second: VertexId,
    },
    /// The second-rule vertex already has a partner
    #[error("second vertex {second:?} already mapped to {first:?}")]
    SecondAlreadyMapped {
        /// The vertex being pushed
        second: VertexId,
        /// Its existing partner in the first rule
        first: VertexId,
    },
}

/// An injective partial map `L₂ → R₁` together with its inverse.
///
/// Both directions are dense vectors indexed by vertex id, so lookups are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    second_to_first: Vec<Option<VertexId>>,
    first_to_second: Vec<Option<VertexId>>,
    // pairs (first, second) in the order they were pushed
    stack: Vec<(VertexId, VertexId)>,
}

impl Match {
    /// The empty correspondence between `first` and `second`.
    pub fn new(first: &Rule, second: &Rule) -> Self {
        Match {
            second_to_first: vec![None; second.vertex_count()],
            first_to_second: vec![None; first.vertex_count()],
            stack: vec![],
        }
    }

    /// Build a correspondence from `(first, second)` vertex pairs.
    pub fn from_pairs<I>(first: &Rule, second: &Rule, pairs: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut m = Match::new(first, second);
        for (v_first, v_second) in pairs {
            m.push(first, second, v_first, v_second)?;
        }
        Ok(m)
    }

    /// Extend the correspondence by identifying `v_first ∈ R₁` with `v_second ∈ L₂`.
    ///
    /// The rules must be the ones this match was created for.
    pub fn push(
        &mut self,
        first: &Rule,
        second: &Rule,
        v_first: VertexId,
        v_second: VertexId,
    ) -> Result<(), MatchError> {
        if !first.graph().contains_vertex(v_first) || v_first.0 >= self.first_to_second.len() {
            return Err(MatchError::UnknownFirst(v_first));
        }
        if !second.graph().contains_vertex(v_second) || v_second.0 >= self.second_to_first.len()
        {
            return Err(MatchError::UnknownSecond(v_second));
        }
        if !first.right_side().contains_vertex(v_first) {
            return Err(MatchError::FirstNotInRight(v_first));
        }
        if !second.left_side().contains_vertex(v_second) {
            return Err(MatchError::SecondNotInLeft(v_second));
        }
        if let Some(existing) = self.first_to_second[v_first.0] {
            return Err(MatchError::FirstAlreadyMapped {
                first: v_first,
                second: existing,
            });
        }
        if let Some(existing) = self.second_to_first[v_second.0] {
            return Err(MatchError::SecondAlreadyMapped {
                second: v_second,
                first: existing,
            });
        }

        self.first_to_second[v_first.0] = Some(v_second);
        self.second_to_first[v_second.0] = Some(v_first);
        self.stack.push((v_first, v_second));
        Ok(())
    }

    /// Remove the most recently pushed pair.
    pub fn pop(&mut self) -> Option<(VertexId, VertexId)> {
        let (v_first, v_second) = self.stack.pop()?;
        self.first_to_second[v_first.0] = None;
        self.second_to_first[v_second.0] = None;
        Some((v_first, v_second))
    }

    /// The first-rule vertex matched to `v_second`, if any.
    pub fn lookup(&self, v_second: VertexId) -> Option<VertexId> {
        self.second_to_first.get(v_second.0).copied().flatten()
    }

    /// The second-rule vertex matched to `v_first`, if any.
    pub fn lookup_inverse(&self, v_first: VertexId) -> Option<VertexId> {
        self.first_to_second.get(v_first.0).copied().flatten()
    }

    /// Number of matched vertex pairs.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Matched `(first, second)` pairs in push order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.stack.iter().copied()
    }
}
