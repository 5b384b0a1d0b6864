use dpo_compose::prelude::*;
use dpo_compose::trace::Phase;
use std::cell::Cell;

struct PrintTrace {
    indent: Cell<usize>,
}

impl PrintTrace {
    fn new() -> Self {
        Self {
            indent: Cell::new(0),
        }
    }

    fn indent(&self) -> usize {
        self.indent.get() * 2
    }
}

fn side(from_first: bool) -> &'static str {
    if from_first {
        "first"
    } else {
        "second"
    }
}

impl ComposeTrace for PrintTrace {
    fn on_event(&self, event: ComposeEvent) {
        match event {
            ComposeEvent::EnterPhase(phase) => {
                self.indent.set(0);
                println!("phase {phase:?}");
                if phase != Phase::Init && phase != Phase::Finalize {
                    self.indent.set(1);
                }
            }
            ComposeEvent::VertexCopied {
                from_first,
                vertex,
                result,
                membership,
            } => println!(
                "{:indent$}copy {} v{} -> r{} ({membership})",
                "",
                side(from_first),
                vertex.0,
                result.0,
                indent = self.indent()
            ),
            ComposeEvent::VertexDeleted { first, second } => println!(
                "{:indent$}drop v{} (created, then deleted by v{})",
                "",
                first.0,
                second.0,
                indent = self.indent()
            ),
            ComposeEvent::VertexComposed {
                second,
                result,
                membership,
            } => println!(
                "{:indent$}glue v{} onto r{} ({membership})",
                "",
                second.0,
                result.0,
                indent = self.indent()
            ),
            ComposeEvent::EdgeCopied {
                from_first,
                edge,
                result,
                membership,
            } => println!(
                "{:indent$}copy {} e{} -> r{} ({membership})",
                "",
                side(from_first),
                edge.0,
                result.0,
                indent = self.indent()
            ),
            ComposeEvent::EdgeSkipped { from_first, edge } => println!(
                "{:indent$}skip {} e{}",
                "",
                side(from_first),
                edge.0,
                indent = self.indent()
            ),
            ComposeEvent::EdgePromoted { second, result } => println!(
                "{:indent$}promote r{} to Context for second e{}",
                "",
                result.0,
                second.0,
                indent = self.indent()
            ),
            ComposeEvent::Failure { phase, reason } => {
                println!("failed in {phase:?}: {reason:?}")
            }
            ComposeEvent::Success { vertices, edges } => {
                println!("composed: {vertices} vertices, {edges} edges")
            }
        }
    }
}

/// Deletes the edge `x - y` and creates a vertex `z` attached to `y`.
fn build_first() -> Rule {
    let mut b = RuleBuilder::new();
    let x = b.add_vertex(Membership::Context);
    let y = b.add_vertex(Membership::Context);
    let z = b.add_vertex(Membership::Right);
    b.add_edge(x, y, Membership::Left).unwrap();
    b.add_edge(y, z, Membership::Right).unwrap();
    b.build()
}

/// Adds an edge between two kept vertices.
fn build_second() -> Rule {
    let mut b = RuleBuilder::new();
    let u = b.add_vertex(Membership::Context);
    let v = b.add_vertex(Membership::Context);
    b.add_edge(u, v, Membership::Right).unwrap();
    b.build()
}

fn main() {
    // RUST_LOG=dpo_compose=trace additionally shows the engine's own log records
    env_logger::init();

    let first = build_first();
    let second = build_second();
    let trace = PrintTrace::new();

    let candidates = [
        ("restore x - y", [(VertexId(0), VertexId(0)), (VertexId(1), VertexId(1))]),
        ("connect x - z", [(VertexId(0), VertexId(0)), (VertexId(2), VertexId(1))]),
        ("recreate y - z", [(VertexId(1), VertexId(0)), (VertexId(2), VertexId(1))]),
    ];
    for (name, pairs) in candidates {
        println!("=== {name} ===");
        let m = match Match::from_pairs(&first, &second, pairs) {
            Ok(m) => m,
            Err(err) => {
                println!("invalid match: {err}");
                continue;
            }
        };
        let composed = compose_traced(&first, &second, &m, (), Some(&trace));
        println!("success: {}", composed.is_some());

        // the same composition, reported through the log facade
        compose_traced(&first, &second, &m, (), Some(&LogTrace));
        println!();
    }
}
