use dpo_compose::prelude::*;
use dpo_compose::trace::Phase;
use test_log::test;

use dpo_compose::membership::Membership::{Context, Left, Right};

fn two_vertex_rule(edge: Membership) -> (Rule, VertexId, VertexId) {
    let mut b = RuleBuilder::new();
    let x0 = b.add_vertex(Context);
    let x1 = b.add_vertex(Context);
    b.add_edge(x0, x1, edge).unwrap();
    (b.build(), x0, x1)
}

#[test]
fn test_delete_then_recreate_edge_keeps_it() {
    let (first, x0, x1) = two_vertex_rule(Left);
    let (second, y0, y1) = two_vertex_rule(Right);
    let m = Match::from_pairs(&first, &second, [(x0, y0), (x1, y1)]).unwrap();

    let c = compose_traced(&first, &second, &m, (), Some(&LogTrace)).expect("composable");
    let r = c.rule();
    assert_eq!(r.vertex_count(), 2);
    assert_eq!(r.membership(c.first_to_result_vertex(x0).unwrap()), Context);
    assert_eq!(r.membership(c.first_to_result_vertex(x1).unwrap()), Context);
    assert_eq!(r.edge_count(), 1);
    let e = r.find_edge(VertexId(0), VertexId(1)).unwrap();
    assert_eq!(r.edge_membership(e), Context);
}

#[test]
fn test_matching_is_undirected() {
    let (first, x0, x1) = two_vertex_rule(Left);
    let (second, y0, y1) = two_vertex_rule(Right);
    let m = Match::from_pairs(&first, &second, [(x0, y1), (x1, y0)]).unwrap();

    let c = compose(&first, &second, &m, ()).expect("composable");
    assert_eq!(c.rule().edge_count(), 1);
    assert_eq!(c.rule().edge_membership(EdgeId(0)), Context);
}

#[test]
fn test_dangling_edge_fails() {
    let mut b = RuleBuilder::new();
    let v0 = b.add_vertex(Right);
    let first = b.build();

    let mut b = RuleBuilder::new();
    let w0 = b.add_vertex(Context);
    let w1 = b.add_vertex(Left);
    b.add_edge(w0, w1, Left).unwrap();
    let second = b.build();

    let m = Match::from_pairs(&first, &second, [(v0, w0)]).unwrap();
    let trace = RecordingTrace::new();
    assert!(compose_traced(&first, &second, &m, (), Some(&trace)).is_none());
    assert!(trace.events().contains(&ComposeEvent::Failure {
        phase: Phase::ComposeEdgesSecond,
        reason: FailureReason::InconsistentEndpoint {
            vertex: Right,
            edge: Left
        },
    }));
}

#[test]
fn test_deleting_an_edge_twice_fails() {
    let (first, x0, x1) = two_vertex_rule(Left);
    let (second, y0, y1) = two_vertex_rule(Left);
    let m = Match::from_pairs(&first, &second, [(x0, y0), (x1, y1)]).unwrap();

    let trace = RecordingTrace::new();
    assert!(compose_traced(&first, &second, &m, (), Some(&trace)).is_none());
    assert_eq!(trace.failures(), vec![FailureReason::ParallelEdgeInLeft]);
}

#[test]
fn test_create_then_destroy_is_a_no_op() {
    // p1 creates z attached to x
    let mut b = RuleBuilder::new();
    let x = b.add_vertex(Context);
    let z = b.add_vertex(Right);
    b.add_edge(x, z, Right).unwrap();
    let p1 = b.build();

    // p2 deletes the edge
    let (p2, x2, z2) = two_vertex_rule(Left);

    // p3 deletes the vertex
    let mut b = RuleBuilder::new();
    let z3 = b.add_vertex(Left);
    let p3 = b.build();

    let m = Match::from_pairs(&p1, &p2, [(x, x2), (z, z2)]).unwrap();
    let p12 = compose(&p1, &p2, &m, ()).expect("composable");
    assert_eq!(p12.rule().edge_count(), 0);
    let z12 = p12.first_to_result_vertex(z).unwrap();
    assert_eq!(p12.rule().membership(z12), Right);

    let m = Match::from_pairs(p12.rule(), &p3, [(z12, z3)]).unwrap();
    let p123 = compose(p12.rule(), &p3, &m, ()).expect("composable");
    let r = p123.rule();
    assert_eq!(r.vertex_count(), 1);
    assert_eq!(r.edge_count(), 0);
    assert_eq!(r.membership(VertexId(0)), Context);
    assert_eq!(p123.first_to_result_vertex(z12), None);
}

#[test]
fn test_compose_all_keeps_successes_in_order() {
    let (first, x0, x1) = two_vertex_rule(Left);

    let mut b = RuleBuilder::new();
    let y0 = b.add_vertex(Context);
    let y1 = b.add_vertex(Context);
    let y2 = b.add_vertex(Context);
    b.add_edge(y0, y1, Left).unwrap();
    b.add_edge(y1, y2, Right).unwrap();
    let second = b.build();

    let matches = [
        // both rules delete x0 - x1
        Match::from_pairs(&first, &second, [(x0, y0), (x1, y1)]).unwrap(),
        // the second rule restores x0 - x1 and deletes an edge to y0
        Match::from_pairs(&first, &second, [(x0, y1), (x1, y2)]).unwrap(),
        Match::new(&first, &second),
    ];

    let results = compose_all(&first, &second, &matches, || ());
    assert_eq!(results.len(), 2);

    let restored = results[0].rule();
    assert_eq!(restored.vertex_count(), 3);
    assert_eq!(restored.left_side().edge_count(), 2);
    assert_eq!(restored.right_side().edge_count(), 1);

    let disjoint = results[1].rule();
    assert_eq!(disjoint.vertex_count(), 5);
    assert_eq!(disjoint.edge_count(), 3);
}

#[test]
fn test_failed_composition_leaves_inputs_usable() {
    let (first, x0, x1) = two_vertex_rule(Left);
    let (second, y0, y1) = two_vertex_rule(Left);
    let mut m = Match::new(&first, &second);
    m.push(&first, &second, x0, y0).unwrap();
    m.push(&first, &second, x1, y1).unwrap();
    assert!(compose(&first, &second, &m, ()).is_none());

    // backtrack and try a smaller match
    assert_eq!(m.pop(), Some((x1, y1)));
    let c = compose(&first, &second, &m, ()).expect("composable");
    assert_eq!(c.rule().vertex_count(), 3);
    assert_eq!(c.rule().left_side().edge_count(), 2);
}
