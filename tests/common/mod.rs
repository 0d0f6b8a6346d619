#![allow(dead_code)]

use shader_graph_compiler::node_compiler::{
    BinaryOperator, InputKind, NodeKind, ScalarType, UnaryFunction,
};
use shader_graph_compiler::{Endpoint, NodeId, ShaderGraph};

pub fn connect(graph: &mut ShaderGraph, from: (NodeId, u32), to: (NodeId, u32)) {
    graph
        .connect(Endpoint::new(from.0, from.1), Endpoint::new(to.0, to.1))
        .unwrap_or_else(|e| panic!("connect {from:?} -> {to:?}: {e}"));
}

/// `round(value_noise(uv) - sin(time) / b)` with `b` left unconnected.
pub fn reference_graph() -> ShaderGraph {
    let mut graph = ShaderGraph::new();
    let nodes = [
        (1, NodeKind::Input(InputKind::Time)),
        (2, NodeKind::ScalarFunc { func: UnaryFunction::Sin }),
        (
            3,
            NodeKind::ScalarOp {
                op: BinaryOperator::Div,
                scalar: ScalarType::Float,
            },
        ),
        (4, NodeKind::Input(InputKind::Uv)),
        (5, NodeKind::ValueNoise),
        (
            6,
            NodeKind::ScalarOp {
                op: BinaryOperator::Sub,
                scalar: ScalarType::Float,
            },
        ),
        (7, NodeKind::ScalarFunc { func: UnaryFunction::Round }),
    ];
    for (id, kind) in nodes {
        graph.add_node(id, kind).unwrap();
    }

    connect(&mut graph, (1, 0), (2, 0));
    connect(&mut graph, (2, 0), (3, 0));
    connect(&mut graph, (3, 0), (6, 1));
    connect(&mut graph, (4, 0), (5, 0));
    connect(&mut graph, (5, 0), (6, 0));
    connect(&mut graph, (6, 0), (7, 0));
    connect(&mut graph, (7, 0), (0, 0));
    graph
}

/// Node ids in the order their `// Kind:id` headers appear in `source`.
pub fn emitted_nodes(source: &str) -> Vec<NodeId> {
    source
        .lines()
        .filter_map(|line| line.strip_prefix("// "))
        .filter_map(|header| header.rsplit_once(':'))
        .map(|(_, id)| {
            id.parse()
                .unwrap_or_else(|e| panic!("bad node header id '{id}': {e}"))
        })
        .collect()
}
