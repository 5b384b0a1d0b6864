use core::fmt;

/// Which side(s) of a rule an element belongs to.
///
/// For a rule `L ⊇ K ⊆ R`, a `Left` element is in `L \ K` (deleted by the rule), a `Right`
/// element is in `R \ K` (created by the rule) and a `Context` element is in `K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Membership {
    Left,
    Context,
    Right,
}

impl Membership {
    /// All three tags, in declaration order.
    pub const ALL: [Membership; 3] = [Membership::Left, Membership::Context, Membership::Right];

    /// Is the element present before the rule is applied?
    pub fn in_left(self) -> bool {
        self != Membership::Right
    }

    /// Is the element present after the rule is applied?
    pub fn in_right(self) -> bool {
        self != Membership::Left
    }

    /// The membership of the same element in the reverse rule.
    pub fn inverse(self) -> Self {
        match self {
            Membership::Left => Membership::Right,
            Membership::Context => Membership::Context,
            Membership::Right => Membership::Left,
        }
    }

    /// Can an edge tagged `self` be incident to a vertex tagged `endpoint`?
    ///
    /// Both endpoints of an edge must exist on every side the edge exists on.
    pub fn edge_compatible_with(self, endpoint: Membership) -> bool {
        (!self.in_left() || endpoint.in_left()) && (!self.in_right() || endpoint.in_right())
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Membership::Left => "Left",
            Membership::Context => "Context",
            Membership::Right => "Right",
        };
        f.write_str(s)
    }
}
