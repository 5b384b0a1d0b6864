use dpo_compose::prelude::*;
use dpo_compose::membership::Membership::{Left, Right};

/// A rule with one vertex of each membership, in the order `Left, Context, Right`.
fn one_of_each() -> Rule {
    let mut b = RuleBuilder::new();
    for m in Membership::ALL {
        b.add_vertex(m);
    }
    b.build()
}

#[test]
fn test_match_only_relates_right_to_left() {
    let first = one_of_each();
    let second = one_of_each();
    let (l, c, r) = (VertexId(0), VertexId(1), VertexId(2));
    assert_eq!(first.membership(l), Left);
    assert_eq!(first.membership(r), Right);

    let mut m = Match::new(&first, &second);
    assert_eq!(m.push(&first, &second, l, c), Err(MatchError::FirstNotInRight(l)));
    assert_eq!(m.push(&first, &second, c, r), Err(MatchError::SecondNotInLeft(r)));
    assert_eq!(
        m.push(&first, &second, c, VertexId(9)),
        Err(MatchError::UnknownSecond(VertexId(9)))
    );

    // created by the first rule, deleted by the second
    m.push(&first, &second, r, l).unwrap();
    m.push(&first, &second, c, c).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.lookup(l), Some(r));
    assert_eq!(m.lookup_inverse(c), Some(c));
    assert_eq!(m.lookup(r), None);
    assert_eq!(m.lookup(VertexId(9)), None);
}

#[test]
fn test_match_is_injective() {
    let first = one_of_each();
    let second = one_of_each();
    let (l, c, r) = (VertexId(0), VertexId(1), VertexId(2));

    let err = Match::from_pairs(&first, &second, [(c, c), (r, c)]).unwrap_err();
    assert_eq!(
        err,
        MatchError::SecondAlreadyMapped {
            second: c,
            first: c
        }
    );
    assert_eq!(err.to_string(), "second vertex VertexId(1) already mapped to VertexId(1)");

    let err = Match::from_pairs(&first, &second, [(c, c), (c, l)]).unwrap_err();
    assert_eq!(
        err,
        MatchError::FirstAlreadyMapped {
            first: c,
            second: c
        }
    );
}

#[test]
fn test_pop_backtracks_in_push_order() {
    let first = one_of_each();
    let second = one_of_each();
    let (l, c, r) = (VertexId(0), VertexId(1), VertexId(2));

    let mut m = Match::new(&first, &second);
    m.push(&first, &second, c, l).unwrap();
    m.push(&first, &second, r, c).unwrap();
    assert_eq!(m.iter().collect::<Vec<_>>(), vec![(c, l), (r, c)]);

    assert_eq!(m.pop(), Some((r, c)));
    assert_eq!(m.lookup(c), None);
    assert_eq!(m.lookup_inverse(r), None);
    // freed vertices can be matched again
    m.push(&first, &second, r, c).unwrap();
    assert_eq!(m.pop(), Some((r, c)));
    assert_eq!(m.pop(), Some((c, l)));
    assert_eq!(m.pop(), None);
    assert!(m.is_empty());
}
