use dpo_compose::prelude::*;
use test_log::test;

/// One vertex with the given labels.
fn vertex_rule(labels: Labels<char>) -> LabelledRule<char> {
    let mut b = LabelledRule::builder();
    b.add_vertex(labels);
    b.build()
}

fn single_match(first: &LabelledRule<char>, second: &LabelledRule<char>) -> Match {
    Match::from_pairs(first.rule(), second.rule(), [(VertexId(0), VertexId(0))]).unwrap()
}

#[test]
fn test_vertex_relabelling_composes() {
    let cases = [
        // relabel twice
        (Labels::Context('a', 'b'), Labels::Context('b', 'c'), Labels::Context('a', 'c')),
        // create, then relabel
        (Labels::Right('a'), Labels::Context('a', 'b'), Labels::Right('b')),
        // relabel, then delete
        (Labels::Context('a', 'b'), Labels::Left('b'), Labels::Left('a')),
    ];
    for (first, second, expected) in cases {
        let first = vertex_rule(first);
        let second = vertex_rule(second);
        let m = single_match(&first, &second);

        let composed = compose_labelled(&first, &second, &m).expect("composable");
        assert_eq!(composed.rule().vertex_count(), 1);
        assert_eq!(composed.vertex_labels(VertexId(0)), &expected);
    }
}

#[test]
fn test_disagreeing_labels_are_rejected() {
    let first = vertex_rule(Labels::Context('a', 'b'));
    let second = vertex_rule(Labels::keep('a'));
    let m = single_match(&first, &second);
    assert!(compose_labelled(&first, &second, &m).is_none());

    // the structure alone composes
    assert!(compose(first.rule(), second.rule(), &m, ()).is_some());
}

/// Two kept vertices labelled `x`, joined by an edge.
fn edge_rule(labels: Labels<char>) -> LabelledRule<char> {
    let mut b = LabelledRule::builder();
    let u = b.add_vertex(Labels::keep('x'));
    let v = b.add_vertex(Labels::keep('x'));
    b.add_edge(u, v, labels).unwrap();
    b.build()
}

fn edge_match(first: &LabelledRule<char>, second: &LabelledRule<char>) -> Match {
    Match::from_pairs(
        first.rule(),
        second.rule(),
        [(VertexId(0), VertexId(0)), (VertexId(1), VertexId(1))],
    )
    .unwrap()
}

#[test]
fn test_edge_labels_compose() {
    let cases = [
        // deleted, then created with another label: relabelled
        (Labels::Left('e'), Labels::Right('f'), Some(Labels::Context('e', 'f'))),
        (Labels::Context('e', 'f'), Labels::Context('f', 'g'), Some(Labels::Context('e', 'g'))),
        (Labels::Context('e', 'f'), Labels::Left('f'), Some(Labels::Left('e'))),
        (Labels::Right('e'), Labels::Context('e', 'f'), Some(Labels::Right('f'))),
        (Labels::Right('e'), Labels::Left('e'), None),
    ];
    for (first, second, expected) in cases {
        let first = edge_rule(first);
        let second = edge_rule(second);
        let m = edge_match(&first, &second);

        let composed = compose_labelled(&first, &second, &m).expect("composable");
        let labels = composed.rule().edges().next().map(|e| composed.edge_labels(e));
        assert_eq!(labels, expected.as_ref());
        assert_eq!(composed.vertex_labels(VertexId(0)), &Labels::keep('x'));
    }
}

#[test]
fn test_disagreeing_edge_labels_are_rejected() {
    let first = edge_rule(Labels::Context('e', 'f'));
    let second = edge_rule(Labels::Left('e'));
    let m = edge_match(&first, &second);
    assert!(compose_labelled(&first, &second, &m).is_none());
}

#[test]
fn test_label_visitor_composes_with_others() {
    let first = vertex_rule(Labels::Right('a'));
    let second = vertex_rule(Labels::Context('a', 'b'));
    let m = single_match(&first, &second);

    let trace = RecordingTrace::new();
    let mut labels = LabelVisitor::new(&first, &second);
    let c = compose_traced(first.rule(), second.rule(), &m, (&mut labels, ()), Some(&trace))
        .expect("composable");
    let composed = labels.into_labelled(c).expect("labels for every element");
    assert_eq!(composed.vertex_labels(VertexId(0)), &Labels::Right('b'));
    assert!(trace.failures().is_empty());
}
