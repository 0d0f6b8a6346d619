mod common;

use common::{connect, emitted_nodes, reference_graph};
use shader_graph_compiler::node_compiler::{
    BinaryOperator, ConstantValue, NodeGenerator, NodeKind, ScalarType, create_generator,
};
use shader_graph_compiler::{CompileError, NodeId, ShaderGraph};

const DECLARATIONS: &str = "in vec2 FragCoord;\nuniform float uTime;\n";
const FRAG_COLOR: &str = "\nout vec4 FragColor;\n";

fn assert_dependency_order(graph: &ShaderGraph, order: &[NodeId]) {
    for (pos, &node) in order.iter().enumerate() {
        for c in graph.connections().iter().filter(|c| c.to.node == node) {
            let upstream = order
                .iter()
                .position(|&n| n == c.from.node)
                .unwrap_or_else(|| panic!("node {} feeds {node} but was not emitted", c.from.node));
            assert!(
                upstream < pos,
                "node {} must be emitted before {node}: {order:?}",
                c.from.node
            );
        }
    }
}

#[test]
fn reference_graph_compiles_to_expected_source() {
    let source = reference_graph().compile().unwrap();
    let helpers = create_generator(&NodeKind::ValueNoise).emit_shared_helper(5);

    let body = concat!(
        "// Input:4\n",
        "\tvec2 var_from_n4_p0 = FragCoord;\n\n",
        "// ValueNoise:5\n",
        "\tfloat var_from_n5_p0 = value_noise(var_from_n4_p0);\n\n",
        "// Input:1\n",
        "\tfloat var_from_n1_p0 = uTime;\n\n",
        "// ScalarFunc:2\n",
        "\tfloat var_from_n2_p0 = sin(var_from_n1_p0);\n\n",
        "// ScalarOp:3\n",
        "\tfloat var_to_n3_p1 = 0.00000;\n",
        "\tfloat var_from_n3_p0 = var_from_n2_p0 / var_to_n3_p1;\n\n",
        "// ScalarOp:6\n",
        "\tfloat var_from_n6_p0 = var_from_n5_p0 - var_from_n3_p0;\n\n",
        "// ScalarFunc:7\n",
        "\tfloat var_from_n7_p0 = round(var_from_n6_p0);\n\n",
        "// Output:0\n",
        "\tFragColor = var_from_n7_p0;\n\n",
    );
    let expected = format!("{DECLARATIONS}{helpers}{FRAG_COLOR}\nvoid main() {{\n{body}}}\n\n");
    assert_eq!(source, expected);
}

#[test]
fn node_headers_start_at_column_zero() {
    let source = reference_graph().compile().unwrap();
    let header = source
        .lines()
        .find(|line| line.ends_with("// Input:4"))
        .unwrap();
    assert_eq!(header, "// Input:4");
    assert!(!source.contains("\t//"));
}

#[test]
fn compilation_is_deterministic() {
    let graph = reference_graph();
    let first = graph.compile().unwrap();
    for _ in 0..5 {
        assert_eq!(graph.compile().unwrap(), first);
    }
    assert_eq!(reference_graph().compile().unwrap(), first);
}

#[test]
fn nodes_are_emitted_once_in_dependency_order() {
    let graph = reference_graph();
    let order = emitted_nodes(&graph.compile().unwrap());
    assert_eq!(order, vec![4, 5, 1, 2, 3, 6, 7, 0]);
    assert_dependency_order(&graph, &order);
}

#[test]
fn shared_declarations_appear_once() {
    let source = reference_graph().compile().unwrap();
    assert_eq!(source.matches("uniform float uTime;").count(), 1);
    assert_eq!(source.matches("in vec2 FragCoord;").count(), 1);
    assert_eq!(source.matches("out vec4 FragColor;").count(), 1);
}

#[test]
fn noise_helpers_appear_once_for_many_noise_nodes() {
    let mut graph = reference_graph();
    let add = NodeKind::ScalarOp {
        op: BinaryOperator::Add,
        scalar: ScalarType::Float,
    };
    // Two more noise nodes summed into the existing chain.
    graph.add_node(8, NodeKind::ValueNoise).unwrap();
    graph.add_node(9, NodeKind::ValueNoise).unwrap();
    graph.add_node(10, add).unwrap();
    graph.add_node(11, add).unwrap();
    connect(&mut graph, (4, 0), (8, 0));
    connect(&mut graph, (4, 0), (9, 0));
    connect(&mut graph, (8, 0), (10, 0));
    connect(&mut graph, (9, 0), (10, 1));
    connect(&mut graph, (10, 0), (11, 0));
    connect(&mut graph, (7, 0), (11, 1));
    connect(&mut graph, (11, 0), (0, 0));

    let source = graph.compile().unwrap();
    assert_eq!(source.matches("float value_noise(vec2 uv) {").count(), 1);
    assert_eq!(source.matches("float value_noise_hash(vec2 p) {").count(), 1);
    assert_eq!(source.matches("= value_noise(").count(), 3);
    assert_eq!(source.matches("// Input:4\n").count(), 1);
}

#[test]
fn unconnected_inputs_get_default_locals() {
    let source = reference_graph().compile().unwrap();
    assert!(source.contains("\tfloat var_to_n3_p1 = 0.00000;\n"));
    assert!(source.contains("var_from_n2_p0 / var_to_n3_p1"));
}

#[test]
fn preview_of_a_leaf_is_minimal() {
    let source = reference_graph().compile_preview(1, 0).unwrap();
    let expected = concat!(
        "in vec2 FragCoord;\nuniform float uTime;\n",
        "\nout vec4 FragColor;\n",
        "\nvoid main() {\n",
        "// Input:1\n",
        "\tfloat var_from_n1_p0 = uTime;\n\n",
        "\tFragColor = vec4(vec3(var_from_n1_p0), 1.0);\n",
        "}\n\n",
    );
    assert_eq!(source, expected);
}

#[test]
fn preview_emits_exactly_the_ancestors() {
    let graph = reference_graph();
    for (&id, _) in graph.nodes().iter().filter(|(id, _)| **id != 0) {
        let source = graph.compile_preview(id, 0).unwrap();
        let order = emitted_nodes(&source);

        let mut emitted = order.clone();
        emitted.sort_unstable();
        emitted.dedup();
        assert_eq!(emitted.len(), order.len(), "node {id}: duplicate headers");
        assert_eq!(
            emitted,
            graph.ancestors(id).into_iter().collect::<Vec<_>>(),
            "node {id}: emitted set differs from ancestors"
        );
        assert_dependency_order(&graph, &order);
        assert!(!source.contains("// Output:0\n"));
        assert!(source.ends_with(&format!(
            "\tFragColor = vec4(vec3(var_from_n{id}_p0), 1.0);\n}}\n\n"
        )));
    }
}

#[test]
fn vec4_preview_drops_alpha() {
    let mut graph = reference_graph();
    graph
        .add_node(20, NodeKind::Constant(ConstantValue::Vec4([0.1, 0.2, 0.3, 0.4])))
        .unwrap();
    let source = graph.compile_preview(20, 0).unwrap();
    assert!(source.contains("\tvec4 var_from_n20_p0 = vec4(0.10000, 0.20000, 0.30000, 0.40000);\n"));
    assert!(source.contains("\tFragColor = vec4(var_from_n20_p0.xyz, 1.0);\n"));
    assert!(!source.contains("vec3(var_from_n20_p0)"));
}

#[test]
fn preview_root_must_exist() {
    let graph = reference_graph();
    assert_eq!(graph.compile_preview(42, 0), Err(CompileError::UnknownRoot(42)));
    assert_eq!(
        graph.compile_preview(3, 1),
        Err(CompileError::RootPortOutOfRange { node: 3, port: 1 })
    );
}

#[test]
fn cycle_is_reported_instead_of_hanging() {
    let mut graph = reference_graph();
    // 7 -> 3 closes the loop 3 -> 6 -> 7 -> 3.
    connect(&mut graph, (7, 0), (3, 1));
    assert!(matches!(graph.compile(), Err(CompileError::CyclicGraph(_))));
    assert!(matches!(
        graph.compile_preview(6, 0),
        Err(CompileError::CyclicGraph(_))
    ));
    // Nodes outside the loop still preview fine.
    assert!(graph.compile_preview(5, 0).is_ok());
}

#[test]
fn removing_a_node_falls_back_to_defaults() {
    let mut graph = reference_graph();
    graph.remove_node(5).unwrap();
    let source = graph.compile().unwrap();
    assert_eq!(emitted_nodes(&source), vec![1, 2, 3, 6, 7, 0]);
    assert!(source.contains("\tfloat var_to_n6_p0 = 0.00000;\n"));
    assert!(!source.contains("value_noise"));
    // Any visited Input node declares every built-in.
    assert!(source.starts_with(DECLARATIONS));
}
