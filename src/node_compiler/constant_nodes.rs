//! Generator for literal constants of every port type.

use super::{ConstantValue, NodeGenerator, assign, take};
use crate::graph::NodeId;
use crate::port::{PortType, fmt_float};

impl ConstantValue {
    /// GLSL literal for this value.
    pub fn literal(self) -> String {
        fn vector(ty: PortType, parts: &[f32]) -> String {
            let parts: Vec<String> = parts.iter().copied().map(fmt_float).collect();
            format!("{}({})", ty.glsl(), parts.join(", "))
        }

        match self {
            ConstantValue::Float(v) => fmt_float(v),
            ConstantValue::Int(v) => v.to_string(),
            ConstantValue::UInt(v) => format!("{v}u"),
            ConstantValue::Bool(v) => v.to_string(),
            ConstantValue::Vec2(v) => vector(PortType::Vec2, &v),
            ConstantValue::Vec3(v) => vector(PortType::Vec3, &v),
            ConstantValue::Vec4(v) => vector(PortType::Vec4, &v),
        }
    }
}

pub struct ConstantGenerator {
    pub value: ConstantValue,
}

impl NodeGenerator for ConstantGenerator {
    fn kind_name(&self) -> &'static str {
        "Constant"
    }

    fn input_ports(&self) -> Vec<PortType> {
        Vec::new()
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.value.port_type()]
    }

    fn emit_statement(&self, _id: NodeId, _inputs: &[String], outputs: &[String]) -> String {
        let Some([out]) = take::<1>(outputs) else {
            return String::new();
        };
        assign(self.value.port_type(), out, &self.value.literal())
    }
}
