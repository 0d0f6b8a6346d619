//! Node generator catalog: the closed set of node kinds and the code each one emits.

pub mod constant_nodes;
pub mod input_nodes;
pub mod logic_nodes;
pub mod math_nodes;
pub mod noise_nodes;
pub mod output_node;
pub mod vector_nodes;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, NodeMap};
use crate::port::PortType;

/// Code generation capability bound to one node for the duration of a compile.
///
/// Every `emit_*` method returns whole lines. Statement lines are tab-indented and
/// assign into the supplied output variables.
pub trait NodeGenerator {
    /// Tag written in the `// Kind:id` header above the node's statements.
    fn kind_name(&self) -> &'static str;

    fn input_ports(&self) -> Vec<PortType>;

    fn output_ports(&self) -> Vec<PortType>;

    /// Declarations (uniform/in/out) this kind of node needs. Deduplicated by text.
    fn emit_global(&self, _id: NodeId) -> String {
        String::new()
    }

    /// Global code that belongs to this node instance alone. Never deduplicated.
    fn emit_node_global(&self, _id: NodeId) -> String {
        String::new()
    }

    /// Function definitions shared by every node of this kind. Deduplicated by text,
    /// so the text must not depend on the node id.
    fn emit_shared_helper(&self, _id: NodeId) -> String {
        String::new()
    }

    fn emit_statement(&self, id: NodeId, inputs: &[String], outputs: &[String]) -> String;
}

pub type GeneratorMap = BTreeMap<NodeId, Box<dyn NodeGenerator>>;

/// Built-in shader inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Uv,
    Time,
}

impl InputKind {
    pub const ALL: [InputKind; 2] = [InputKind::Uv, InputKind::Time];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstantValue {
    Float(f32),
    Int(i32),
    UInt(u32),
    Bool(bool),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl ConstantValue {
    pub fn port_type(self) -> PortType {
        match self {
            ConstantValue::Float(_) => PortType::Float,
            ConstantValue::Int(_) => PortType::Int,
            ConstantValue::UInt(_) => PortType::UInt,
            ConstantValue::Bool(_) => PortType::Bool,
            ConstantValue::Vec2(_) => PortType::Vec2,
            ConstantValue::Vec3(_) => PortType::Vec3,
            ConstantValue::Vec4(_) => PortType::Vec4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Float,
    Int,
    UInt,
}

impl ScalarType {
    pub fn port_type(self) -> PortType {
        match self {
            ScalarType::Float => PortType::Float,
            ScalarType::Int => PortType::Int,
            ScalarType::UInt => PortType::UInt,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorType {
    Vec2,
    Vec3,
    Vec4,
}

impl VectorType {
    pub fn port_type(self) -> PortType {
        match self {
            VectorType::Vec2 => PortType::Vec2,
            VectorType::Vec3 => PortType::Vec3,
            VectorType::Vec4 => PortType::Vec4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Max,
    Min,
    Atan2,
    Reflect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Exp,
    Sqrt,
    InverseSqrt,
    Abs,
    Sign,
    Floor,
    Round,
    Ceil,
    Trunc,
    Fract,
    Saturate,
    Negate,
    Reciprocal,
    OneMinus,
    Degrees,
    Radians,
    Log2,
    Exp2,
    Normalize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanCheck {
    IsInf,
    IsNan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

/// How a component-wise vector comparison collapses to one boolean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    All,
    Any,
}

/// Every node kind the compiler understands, with its immutable parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Input(InputKind),
    Output,
    Constant(ConstantValue),
    ScalarOp { op: BinaryOperator, scalar: ScalarType },
    VectorOp { op: BinaryOperator, vector: VectorType },
    ScalarFunc { func: UnaryFunction },
    VectorFunc { func: UnaryFunction, vector: VectorType },
    ValueNoise,
    GradientNoise,
    SimplexNoise,
    Dot { vector: VectorType },
    Length { vector: VectorType },
    Distance { vector: VectorType },
    Clamp { ty: PortType },
    Step { ty: PortType },
    SmoothStep { ty: PortType },
    Mix { ty: PortType },
    Compose { vector: VectorType },
    Decompose { vector: VectorType },
    If,
    Switch { ty: PortType },
    IsInfNan { check: NanCheck },
    Compare {
        ty: PortType,
        op: Comparison,
        condition: Condition,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        create_generator(self).kind_name()
    }

    pub fn input_ports(&self) -> Vec<PortType> {
        create_generator(self).input_ports()
    }

    pub fn output_ports(&self) -> Vec<PortType> {
        create_generator(self).output_ports()
    }
}

/// Catalog lookup: the generator implementing `kind`.
pub fn create_generator(kind: &NodeKind) -> Box<dyn NodeGenerator> {
    use noise_nodes::NoiseFlavor;

    match *kind {
        NodeKind::Input(input) => Box::new(input_nodes::InputGenerator { input }),
        NodeKind::Output => Box::new(output_node::OutputGenerator),
        NodeKind::Constant(value) => Box::new(constant_nodes::ConstantGenerator { value }),
        NodeKind::ScalarOp { op, scalar } => Box::new(math_nodes::ScalarOpGenerator { op, scalar }),
        NodeKind::VectorOp { op, vector } => Box::new(vector_nodes::VectorOpGenerator { op, vector }),
        NodeKind::ScalarFunc { func } => Box::new(math_nodes::ScalarFuncGenerator { func }),
        NodeKind::VectorFunc { func, vector } => {
            Box::new(vector_nodes::VectorFuncGenerator { func, vector })
        }
        NodeKind::ValueNoise => Box::new(noise_nodes::NoiseGenerator::new(NoiseFlavor::Value)),
        NodeKind::GradientNoise => {
            Box::new(noise_nodes::NoiseGenerator::new(NoiseFlavor::Gradient))
        }
        NodeKind::SimplexNoise => Box::new(noise_nodes::NoiseGenerator::new(NoiseFlavor::Simplex)),
        NodeKind::Dot { vector } => Box::new(vector_nodes::DotGenerator { vector }),
        NodeKind::Length { vector } => Box::new(vector_nodes::LengthGenerator { vector }),
        NodeKind::Distance { vector } => Box::new(vector_nodes::DistanceGenerator { vector }),
        NodeKind::Clamp { ty } => Box::new(math_nodes::ClampGenerator { ty }),
        NodeKind::Step { ty } => Box::new(math_nodes::StepGenerator { ty }),
        NodeKind::SmoothStep { ty } => Box::new(math_nodes::SmoothStepGenerator { ty }),
        NodeKind::Mix { ty } => Box::new(math_nodes::MixGenerator { ty }),
        NodeKind::Compose { vector } => Box::new(vector_nodes::ComposeGenerator { vector }),
        NodeKind::Decompose { vector } => Box::new(vector_nodes::DecomposeGenerator { vector }),
        NodeKind::If => Box::new(logic_nodes::IfGenerator),
        NodeKind::Switch { ty } => Box::new(logic_nodes::SwitchGenerator { ty }),
        NodeKind::IsInfNan { check } => Box::new(logic_nodes::IsInfNanGenerator { check }),
        NodeKind::Compare { ty, op, condition } => {
            Box::new(logic_nodes::CompareGenerator { ty, op, condition })
        }
    }
}

/// One generator per node, for a single compile call.
pub fn build_generators(nodes: &NodeMap) -> GeneratorMap {
    nodes
        .iter()
        .map(|(id, node)| (*id, create_generator(&node.kind)))
        .collect()
}

/// Borrow the first `N` variable names, or `None` if fewer were supplied.
pub(crate) fn take<const N: usize>(vars: &[String]) -> Option<[&str; N]> {
    if vars.len() < N {
        return None;
    }
    Some(std::array::from_fn(|i| vars[i].as_str()))
}

/// `\t{ty} {out} = {expr};\n`
pub(crate) fn assign(ty: PortType, out: &str, expr: &str) -> String {
    format!("\t{} {out} = {expr};\n", ty.glsl())
}
