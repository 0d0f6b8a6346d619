//! Generators for branching and predicate nodes (If, Switch, IsInfNan, Compare).

use super::{Comparison, Condition, NanCheck, NodeGenerator, assign, take};
use crate::graph::NodeId;
use crate::port::PortType;

/// Picks one of three vec3 values by comparing `a` against `b` within a tolerance.
///
/// Inputs: a, b, tolerance, value when equal, value when greater, value when less.
pub struct IfGenerator;

impl NodeGenerator for IfGenerator {
    fn kind_name(&self) -> &'static str {
        "If"
    }

    /// `a`, `b`, tolerance, then the results for `a == b`, `a > b` and `a < b`.
    fn input_ports(&self) -> Vec<PortType> {
        vec![
            PortType::Float,
            PortType::Float,
            PortType::Float,
            PortType::Vec3,
            PortType::Vec3,
            PortType::Vec3,
        ]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Vec3]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b, tol, eq, gt, lt]), Some([out])) = (take::<6>(inputs), take::<1>(outputs))
        else {
            return String::new();
        };
        let mut code = String::new();
        code += &format!("\tvec3 {out};\n");
        code += &format!("\tif (abs({a} - {b}) < {tol}) {{\n");
        code += &format!("\t\t{out} = {eq};\n");
        code += &format!("\t}} else if ({a} < {b}) {{\n");
        code += &format!("\t\t{out} = {lt};\n");
        code += "\t} else {\n";
        code += &format!("\t\t{out} = {gt};\n");
        code += "\t}\n";
        code
    }
}

/// `condition ? when_true : when_false`
pub struct SwitchGenerator {
    pub ty: PortType,
}

impl NodeGenerator for SwitchGenerator {
    fn kind_name(&self) -> &'static str {
        "Switch"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![PortType::Bool, self.ty, self.ty]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.ty]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([cond, t, f]), Some([out])) = (take::<3>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(self.ty, out, &format!("{cond} ? {t} : {f}"))
    }
}

pub struct IsInfNanGenerator {
    pub check: NanCheck,
}

impl NodeGenerator for IsInfNanGenerator {
    fn kind_name(&self) -> &'static str {
        "IsInfNan"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![PortType::Float]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Bool]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([x]), Some([out])) = (take::<1>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        let func = match self.check {
            NanCheck::IsInf => "isinf",
            NanCheck::IsNan => "isnan",
        };
        assign(PortType::Bool, out, &format!("{func}({x})"))
    }
}

/// Compares two values of the same type, producing a boolean.
///
/// Booleans only support (in)equality; any ordering op on them is emitted as `==`.
pub struct CompareGenerator {
    pub ty: PortType,
    pub op: Comparison,
    pub condition: Condition,
}

impl CompareGenerator {
    fn expression(&self, a: &str, b: &str) -> String {
        if self.ty.is_vector() {
            let func = match self.op {
                Comparison::Equal => "equal",
                Comparison::NotEqual => "notEqual",
                Comparison::Greater => "greaterThan",
                Comparison::GreaterEqual => "greaterThanEqual",
                Comparison::Less => "lessThan",
                Comparison::LessEqual => "lessThanEqual",
            };
            let reduce = match self.condition {
                Condition::All => "all",
                Condition::Any => "any",
            };
            return format!("{reduce}({func}({a}, {b}))");
        }

        let op = match (self.ty, self.op) {
            (PortType::Bool, Comparison::NotEqual) => "!=",
            (PortType::Bool, _) => "==",
            (_, Comparison::Equal) => "==",
            (_, Comparison::NotEqual) => "!=",
            (_, Comparison::Greater) => ">",
            (_, Comparison::GreaterEqual) => ">=",
            (_, Comparison::Less) => "<",
            (_, Comparison::LessEqual) => "<=",
        };
        format!("{a} {op} {b}")
    }
}

impl NodeGenerator for CompareGenerator {
    fn kind_name(&self) -> &'static str {
        "Compare"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.ty; 2]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Bool]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b]), Some([out])) = (take::<2>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(PortType::Bool, out, &self.expression(a, b))
    }
}
