//! Generators for vector nodes (VectorOp, VectorFunc, Dot, Length, Distance,
//! Compose, Decompose).

use super::math_nodes::{binary_expression, unary_expression};
use super::{BinaryOperator, NodeGenerator, UnaryFunction, VectorType, assign, take};
use crate::graph::NodeId;
use crate::port::PortType;

const SWIZZLE: [&str; 4] = ["x", "y", "z", "w"];

/// Component-wise binary operator over two vectors.
pub struct VectorOpGenerator {
    pub op: BinaryOperator,
    pub vector: VectorType,
}

impl NodeGenerator for VectorOpGenerator {
    fn kind_name(&self) -> &'static str {
        "VectorOp"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type(); 2]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type()]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b]), Some([out])) = (take::<2>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        let ty = self.vector.port_type();
        assign(ty, out, &binary_expression(self.op, ty, a, b))
    }
}

/// Component-wise unary function over a vector.
pub struct VectorFuncGenerator {
    pub func: UnaryFunction,
    pub vector: VectorType,
}

impl NodeGenerator for VectorFuncGenerator {
    fn kind_name(&self) -> &'static str {
        "VectorFunc"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type()]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type()]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([x]), Some([out])) = (take::<1>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(self.vector.port_type(), out, &unary_expression(self.func, x))
    }
}

pub struct DotGenerator {
    pub vector: VectorType,
}

impl NodeGenerator for DotGenerator {
    fn kind_name(&self) -> &'static str {
        "Dot"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type(); 2]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Float]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b]), Some([out])) = (take::<2>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(PortType::Float, out, &format!("dot({a}, {b})"))
    }
}

pub struct LengthGenerator {
    pub vector: VectorType,
}

impl NodeGenerator for LengthGenerator {
    fn kind_name(&self) -> &'static str {
        "Length"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type()]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Float]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([v]), Some([out])) = (take::<1>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(PortType::Float, out, &format!("length({v})"))
    }
}

pub struct DistanceGenerator {
    pub vector: VectorType,
}

impl NodeGenerator for DistanceGenerator {
    fn kind_name(&self) -> &'static str {
        "Distance"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type(); 2]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Float]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b]), Some([out])) = (take::<2>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(PortType::Float, out, &format!("distance({a}, {b})"))
    }
}

/// Builds a vector from one float per component.
pub struct ComposeGenerator {
    pub vector: VectorType,
}

impl NodeGenerator for ComposeGenerator {
    fn kind_name(&self) -> &'static str {
        "Compose"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![PortType::Float; self.vector.port_type().components()]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type()]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let ty = self.vector.port_type();
        let n = ty.components();
        let Some([out]) = take::<1>(outputs) else {
            return String::new();
        };
        if inputs.len() < n {
            return String::new();
        }
        assign(ty, out, &format!("{}({})", ty.glsl(), inputs[..n].join(", ")))
    }
}

/// Splits a vector into one float per component.
pub struct DecomposeGenerator {
    pub vector: VectorType,
}

impl NodeGenerator for DecomposeGenerator {
    fn kind_name(&self) -> &'static str {
        "Decompose"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.vector.port_type()]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Float; self.vector.port_type().components()]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let n = self.vector.port_type().components();
        let Some([v]) = take::<1>(inputs) else {
            return String::new();
        };
        if outputs.len() < n {
            return String::new();
        }
        outputs[..n]
            .iter()
            .zip(SWIZZLE)
            .map(|(out, c)| assign(PortType::Float, out, &format!("{v}.{c}")))
            .collect()
    }
}
