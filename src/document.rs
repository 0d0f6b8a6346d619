//! JSON graph documents: the serialized node/connection lists handed over by the
//! editor, and their conversion into a [`ShaderGraph`].

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::graph::{Endpoint, NodeId, OUTPUT_NODE_ID, ShaderGraph};
use crate::node_compiler::{
    BinaryOperator, Comparison, Condition, ConstantValue, InputKind, NanCheck, NodeKind,
    ScalarType, UnaryFunction, VectorType,
};
use crate::port::PortType;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GraphDocument {
    #[serde(default)]
    pub version: Option<String>,
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeEntry {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionEntry {
    pub from: Endpoint,
    pub to: Endpoint,
}

pub fn parse_graph_document(text: &str) -> Result<GraphDocument> {
    serde_json::from_str(text).context("failed to parse shader graph json")
}

pub fn load_graph_from_str(text: &str) -> Result<ShaderGraph> {
    Ok(parse_graph_document(text)?.into_graph())
}

pub fn load_graph_from_path(path: impl AsRef<std::path::Path>) -> Result<ShaderGraph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader graph json at {}", path.display()))?;
    load_graph_from_str(&text).with_context(|| format!("in {}", path.display()))
}

impl GraphDocument {
    /// Builds the graph, skipping (with a warning) any node whose type or params
    /// cannot be understood and any connection that does not fit the nodes' ports.
    ///
    /// The Output node always exists at id 0, whether or not the document lists it.
    pub fn into_graph(self) -> ShaderGraph {
        let mut graph = ShaderGraph::new();

        for entry in &self.nodes {
            let is_output_type = entry.node_type == "Output";
            if entry.id == OUTPUT_NODE_ID || is_output_type {
                if entry.id != OUTPUT_NODE_ID || !is_output_type {
                    warn!(
                        "skipping node {} ({}): id 0 is reserved for the single Output node",
                        entry.id, entry.node_type
                    );
                }
                continue;
            }

            let kind = match node_kind(&entry.node_type, &entry.params) {
                Ok(kind) => kind,
                Err(e) => {
                    warn!("skipping node {}: {e:#}", entry.id);
                    continue;
                }
            };
            if let Err(e) = graph.add_node(entry.id, kind) {
                warn!("skipping node {}: {e}", entry.id);
            }
        }

        for c in &self.connections {
            if let Err(e) = graph.connect(c.from, c.to) {
                warn!(
                    "skipping connection {}:{} -> {}:{}: {e}",
                    c.from.node, c.from.port, c.to.node, c.to.port
                );
            }
        }

        graph
    }
}

/// Reads `params[key]`, falling back to `default` when the key is absent.
fn parse_param<T: DeserializeOwned>(
    params: &HashMap<String, serde_json::Value>,
    key: &str,
    default: T,
) -> Result<T> {
    match params.get(key) {
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| anyhow!("invalid param '{key}' = {v}: {e}")),
        None => Ok(default),
    }
}

fn constant_value(params: &HashMap<String, serde_json::Value>) -> Result<ConstantValue> {
    let ty: PortType = parse_param(params, "type", PortType::Float)?;
    Ok(match ty {
        PortType::Float => ConstantValue::Float(parse_param(params, "value", 0.0)?),
        PortType::Int => ConstantValue::Int(parse_param(params, "value", 0)?),
        PortType::UInt => ConstantValue::UInt(parse_param(params, "value", 0)?),
        PortType::Bool => ConstantValue::Bool(parse_param(params, "value", false)?),
        PortType::Vec2 => ConstantValue::Vec2(parse_param(params, "value", [0.0; 2])?),
        PortType::Vec3 => ConstantValue::Vec3(parse_param(params, "value", [0.0; 3])?),
        PortType::Vec4 => ConstantValue::Vec4(parse_param(params, "value", [0.0; 4])?),
    })
}

fn numeric(node_type: &str, ty: PortType) -> Result<PortType> {
    if ty == PortType::Bool {
        bail!("{node_type} does not accept bool operands");
    }
    Ok(ty)
}

/// Step, SmoothStep and Mix only have float and float-vector overloads.
fn float_based(node_type: &str, ty: PortType) -> Result<PortType> {
    if matches!(ty, PortType::Int | PortType::UInt) {
        bail!("{node_type} has no {} overload", ty.glsl());
    }
    numeric(node_type, ty)
}

/// Maps a document node type plus its params onto a [`NodeKind`].
///
/// Missing params take per-kind defaults.
pub fn node_kind(node_type: &str, params: &HashMap<String, serde_json::Value>) -> Result<NodeKind> {
    let vector = || parse_param(params, "vector", VectorType::Vec3);
    let ty = || parse_param(params, "type", PortType::Float);

    let kind = match node_type {
        "Input" => NodeKind::Input(parse_param(params, "input", InputKind::Uv)?),
        "Constant" => NodeKind::Constant(constant_value(params)?),
        "ScalarOp" => NodeKind::ScalarOp {
            op: parse_param(params, "op", BinaryOperator::Add)?,
            scalar: parse_param(params, "scalar", ScalarType::Float)?,
        },
        "VectorOp" => NodeKind::VectorOp {
            op: parse_param(params, "op", BinaryOperator::Add)?,
            vector: vector()?,
        },
        "ScalarFunc" => NodeKind::ScalarFunc {
            func: parse_param(params, "func", UnaryFunction::Sin)?,
        },
        "VectorFunc" => NodeKind::VectorFunc {
            func: parse_param(params, "func", UnaryFunction::Normalize)?,
            vector: vector()?,
        },
        "ValueNoise" => NodeKind::ValueNoise,
        "GradientNoise" => NodeKind::GradientNoise,
        "SimplexNoise" => NodeKind::SimplexNoise,
        "Dot" => NodeKind::Dot { vector: vector()? },
        "Length" => NodeKind::Length { vector: vector()? },
        "Distance" => NodeKind::Distance { vector: vector()? },
        "Clamp" => NodeKind::Clamp {
            ty: numeric(node_type, ty()?)?,
        },
        "Step" => NodeKind::Step {
            ty: float_based(node_type, ty()?)?,
        },
        "SmoothStep" => NodeKind::SmoothStep {
            ty: float_based(node_type, ty()?)?,
        },
        "Mix" => NodeKind::Mix {
            ty: float_based(node_type, ty()?)?,
        },
        "Compose" => NodeKind::Compose { vector: vector()? },
        "Decompose" => NodeKind::Decompose { vector: vector()? },
        "If" => NodeKind::If,
        "Switch" => NodeKind::Switch { ty: ty()? },
        "IsInfNan" => NodeKind::IsInfNan {
            check: parse_param(params, "check", NanCheck::IsNan)?,
        },
        "Compare" => {
            let ty = ty()?;
            let mut op = parse_param(params, "op", Comparison::Equal)?;
            if ty == PortType::Bool && !matches!(op, Comparison::Equal | Comparison::NotEqual) {
                warn!("boolean Compare only supports equal/not_equal; using equal instead of {op:?}");
                op = Comparison::Equal;
            }
            NodeKind::Compare {
                ty,
                op,
                condition: parse_param(params, "condition", Condition::All)?,
            }
        }
        "Output" => bail!("Output nodes are only allowed at id 0"),
        other => bail!("unsupported node type: {other}"),
    };
    Ok(kind)
}
