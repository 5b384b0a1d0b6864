use dpo_compose::prelude::*;
use proptest::prelude::*;

use crate::strategy::{arb_composable, arb_rule, diagonal};

/// Membership of the result vertex for a matched pair, or `None` if the vertex disappears.
fn merged(first: Membership, second: Membership) -> Option<Membership> {
    use dpo_compose::membership::Membership::*;
    match (first, second) {
        (Right, Left) => None,
        (Right, _) => Some(Right),
        (Context, Left) => Some(Left),
        (Context, _) => Some(Context),
        (Left, _) => unreachable!("matched vertices are in the right side of the first rule"),
    }
}

proptest! {
    #[test]
    fn composition_is_deterministic((first, second, m) in arb_composable(5)) {
        let a = compose(&first, &second, &m, ());
        let b = compose(&first, &second, &m, ());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn compositions_are_valid_rules((first, second, m) in arb_composable(5)) {
        if let Some(c) = compose(&first, &second, &m, ()) {
            prop_assert_eq!(c.rule().validate(), Ok(()));
        }
    }

    #[test]
    fn vertex_maps_follow_the_match((first, second, m) in arb_composable(5)) {
        let Some(c) = compose(&first, &second, &m, ()) else {
            return Ok(());
        };
        let r = c.rule();

        let deleted = m
            .iter()
            .filter(|&(v1, v2)| merged(first.membership(v1), second.membership(v2)).is_none())
            .count();
        prop_assert_eq!(
            r.vertex_count(),
            first.vertex_count() + second.vertex_count() - m.len() - deleted
        );

        for (v1, v2) in m.iter() {
            let expected = merged(first.membership(v1), second.membership(v2));
            let actual = c.second_to_result_vertex(v2).map(|v| r.membership(v));
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(c.first_to_result_vertex(v1), c.second_to_result_vertex(v2));
        }
        for v1 in first.vertices().filter(|&v| m.lookup_inverse(v).is_none()) {
            let v = c.first_to_result_vertex(v1);
            prop_assert_eq!(v.map(|v| r.membership(v)), Some(first.membership(v1)));
        }
        for v2 in second.vertices().filter(|&v| m.lookup(v).is_none()) {
            let v = c.second_to_result_vertex(v2);
            prop_assert_eq!(v.map(|v| r.membership(v)), Some(second.membership(v2)));
        }
    }

    #[test]
    fn trace_ends_with_the_outcome((first, second, m) in arb_composable(4)) {
        let trace = RecordingTrace::new();
        let result = compose_traced(&first, &second, &m, (), Some(&trace));
        let events = trace.events();
        prop_assert!(!events.is_empty());

        match result {
            Some(c) => {
                prop_assert!(trace.failures().is_empty());
                prop_assert_eq!(
                    events.last().copied(),
                    Some(ComposeEvent::Success {
                        vertices: c.rule().vertex_count(),
                        edges: c.rule().edge_count(),
                    })
                );
            }
            None => {
                prop_assert_eq!(trace.failures().len(), 1);
                let ends_with_failure = matches!(events.last(), Some(ComposeEvent::Failure { .. }));
                prop_assert!(ends_with_failure);
            }
        }
    }

    #[test]
    fn empty_rule_is_a_unit(rule in arb_rule(5)) {
        let empty = Rule::empty();

        let m = Match::new(&rule, &empty);
        let c = compose(&rule, &empty, &m, ());
        prop_assert_eq!(c.map(Composition::into_rule), Some(rule.clone()));

        let m = Match::new(&empty, &rule);
        let c = compose(&empty, &rule, &m, ());
        prop_assert_eq!(c.map(Composition::into_rule), Some(rule));
    }

    #[test]
    fn rule_then_inverse_restores_left_side(rule in arb_rule(5)) {
        let inverse = rule.inverse();
        let m = diagonal(&rule, &inverse);

        let c = compose(&rule, &inverse, &m, ()).expect("a rule composes with its inverse");
        let r = c.rule();
        prop_assert_eq!(r.validate(), Ok(()));

        let left = rule.left_side();
        prop_assert_eq!(r.left_side().vertex_count(), left.vertex_count());
        prop_assert_eq!(r.right_side().vertex_count(), left.vertex_count());
        prop_assert_eq!(r.left_side().edge_count(), left.edge_count());
        prop_assert_eq!(r.right_side().edge_count(), left.edge_count());
    }
}
