//! Generators for scalar math nodes (ScalarOp, ScalarFunc) and the type-generic
//! range functions (Clamp, Step, SmoothStep, Mix).

use super::{BinaryOperator, NodeGenerator, ScalarType, UnaryFunction, assign, take};
use crate::graph::NodeId;
use crate::port::PortType;

/// Expression applying `op` to `a` and `b` of type `ty`.
///
/// Integer operands of float-only builtins round-trip through `float`.
pub(crate) fn binary_expression(op: BinaryOperator, ty: PortType, a: &str, b: &str) -> String {
    let integral = matches!(ty, PortType::Int | PortType::UInt);
    let float_builtin = |name: &str| {
        if integral {
            format!("{}({name}(float({a}), float({b})))", ty.glsl())
        } else {
            format!("{name}({a}, {b})")
        }
    };

    match op {
        BinaryOperator::Add => format!("{a} + {b}"),
        BinaryOperator::Sub => format!("{a} - {b}"),
        BinaryOperator::Mul => format!("{a} * {b}"),
        BinaryOperator::Div => format!("{a} / {b}"),
        BinaryOperator::Mod if integral => format!("{a} % {b}"),
        BinaryOperator::Mod => format!("mod({a}, {b})"),
        BinaryOperator::Max => format!("max({a}, {b})"),
        BinaryOperator::Min => format!("min({a}, {b})"),
        BinaryOperator::Pow => float_builtin("pow"),
        BinaryOperator::Atan2 => float_builtin("atan"),
        BinaryOperator::Reflect => float_builtin("reflect"),
    }
}

/// Expression applying `func` to the float-based operand `x`.
pub(crate) fn unary_expression(func: UnaryFunction, x: &str) -> String {
    let call = |name: &str| format!("{name}({x})");
    match func {
        UnaryFunction::Sin => call("sin"),
        UnaryFunction::Cos => call("cos"),
        UnaryFunction::Tan => call("tan"),
        UnaryFunction::Asin => call("asin"),
        UnaryFunction::Acos => call("acos"),
        UnaryFunction::Atan => call("atan"),
        UnaryFunction::Sinh => call("sinh"),
        UnaryFunction::Cosh => call("cosh"),
        UnaryFunction::Tanh => call("tanh"),
        UnaryFunction::Log => call("log"),
        UnaryFunction::Exp => call("exp"),
        UnaryFunction::Sqrt => call("sqrt"),
        UnaryFunction::InverseSqrt => call("inversesqrt"),
        UnaryFunction::Abs => call("abs"),
        UnaryFunction::Sign => call("sign"),
        UnaryFunction::Floor => call("floor"),
        UnaryFunction::Round => call("round"),
        UnaryFunction::Ceil => call("ceil"),
        UnaryFunction::Trunc => call("trunc"),
        UnaryFunction::Fract => call("fract"),
        UnaryFunction::Saturate => format!("clamp({x}, 0.0, 1.0)"),
        UnaryFunction::Negate => format!("-({x})"),
        UnaryFunction::Reciprocal => format!("1.0 / {x}"),
        UnaryFunction::OneMinus => format!("1.0 - {x}"),
        UnaryFunction::Degrees => call("degrees"),
        UnaryFunction::Radians => call("radians"),
        UnaryFunction::Log2 => call("log2"),
        UnaryFunction::Exp2 => call("exp2"),
        UnaryFunction::Normalize => call("normalize"),
    }
}

/// Binary operator over two scalars of the same type.
pub struct ScalarOpGenerator {
    pub op: BinaryOperator,
    pub scalar: ScalarType,
}

impl NodeGenerator for ScalarOpGenerator {
    fn kind_name(&self) -> &'static str {
        "ScalarOp"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.scalar.port_type(); 2]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.scalar.port_type()]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b]), Some([out])) = (take::<2>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        let ty = self.scalar.port_type();
        assign(ty, out, &binary_expression(self.op, ty, a, b))
    }
}

/// Unary function over a float.
pub struct ScalarFuncGenerator {
    pub func: UnaryFunction,
}

impl NodeGenerator for ScalarFuncGenerator {
    fn kind_name(&self) -> &'static str {
        "ScalarFunc"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![PortType::Float]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![PortType::Float]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([x]), Some([out])) = (take::<1>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(PortType::Float, out, &unary_expression(self.func, x))
    }
}

/// `clamp(x, min, max)`
pub struct ClampGenerator {
    pub ty: PortType,
}

impl NodeGenerator for ClampGenerator {
    fn kind_name(&self) -> &'static str {
        "Clamp"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.ty; 3]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.ty]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([x, lo, hi]), Some([out])) = (take::<3>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(self.ty, out, &format!("clamp({x}, {lo}, {hi})"))
    }
}

/// `step(edge, x)`
pub struct StepGenerator {
    pub ty: PortType,
}

impl NodeGenerator for StepGenerator {
    fn kind_name(&self) -> &'static str {
        "Step"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.ty; 2]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.ty]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([edge, x]), Some([out])) = (take::<2>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(self.ty, out, &format!("step({edge}, {x})"))
    }
}

/// `smoothstep(edge0, edge1, x)`
pub struct SmoothStepGenerator {
    pub ty: PortType,
}

impl NodeGenerator for SmoothStepGenerator {
    fn kind_name(&self) -> &'static str {
        "SmoothStep"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.ty; 3]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.ty]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([e0, e1, x]), Some([out])) = (take::<3>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(self.ty, out, &format!("smoothstep({e0}, {e1}, {x})"))
    }
}

/// `mix(a, b, weight)` with a weight of the same type as the operands.
pub struct MixGenerator {
    pub ty: PortType,
}

impl NodeGenerator for MixGenerator {
    fn kind_name(&self) -> &'static str {
        "Mix"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![self.ty; 3]
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.ty]
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], outputs: &[String]) -> String {
        let (Some([a, b, w]), Some([out])) = (take::<3>(inputs), take::<1>(outputs)) else {
            return String::new();
        };
        assign(self.ty, out, &format!("mix({a}, {b}, {w})"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::vars;
    use super::*;

    #[test]
    fn float_division() {
        let g = ScalarOpGenerator {
            op: BinaryOperator::Div,
            scalar: ScalarType::Float,
        };
        let inputs = vec!["var_from_n2_p0".to_string(), "var_to_n3_p1".to_string()];
        let outputs = vec!["var_from_n3_p0".to_string()];
        assert_eq!(
            g.emit_statement(3, &inputs, &outputs),
            "\tfloat var_from_n3_p0 = var_from_n2_p0 / var_to_n3_p1;\n"
        );
    }

    #[test]
    fn modulo_depends_on_scalar_type() {
        let float_mod = ScalarOpGenerator {
            op: BinaryOperator::Mod,
            scalar: ScalarType::Float,
        };
        let int_mod = ScalarOpGenerator {
            op: BinaryOperator::Mod,
            scalar: ScalarType::Int,
        };
        let i = vars("i", 2);
        let o = vars("o", 1);
        assert_eq!(float_mod.emit_statement(1, &i, &o), "\tfloat o0 = mod(i0, i1);\n");
        assert_eq!(int_mod.emit_statement(1, &i, &o), "\tint o0 = i0 % i1;\n");
    }

    #[test]
    fn integer_pow_goes_through_float() {
        assert_eq!(
            binary_expression(BinaryOperator::Pow, PortType::UInt, "a", "b"),
            "uint(pow(float(a), float(b)))"
        );
        assert_eq!(
            binary_expression(BinaryOperator::Atan2, PortType::Float, "y", "x"),
            "atan(y, x)"
        );
    }

    #[test]
    fn unary_functions() {
        assert_eq!(unary_expression(UnaryFunction::Round, "v"), "round(v)");
        assert_eq!(unary_expression(UnaryFunction::Saturate, "v"), "clamp(v, 0.0, 1.0)");
        assert_eq!(unary_expression(UnaryFunction::OneMinus, "v"), "1.0 - v");
        assert_eq!(unary_expression(UnaryFunction::InverseSqrt, "v"), "inversesqrt(v)");
    }

    #[test]
    fn range_functions() {
        let i = vars("i", 3);
        let o = vars("o", 1);
        let clamp = ClampGenerator { ty: PortType::Vec3 };
        assert_eq!(clamp.emit_statement(1, &i, &o), "\tvec3 o0 = clamp(i0, i1, i2);\n");
        let step = StepGenerator { ty: PortType::Float };
        assert_eq!(step.emit_statement(1, &i, &o), "\tfloat o0 = step(i0, i1);\n");
        let smooth = SmoothStepGenerator { ty: PortType::Float };
        assert_eq!(
            smooth.emit_statement(1, &i, &o),
            "\tfloat o0 = smoothstep(i0, i1, i2);\n"
        );
        let mix = MixGenerator { ty: PortType::Vec4 };
        assert_eq!(mix.emit_statement(1, &i, &o), "\tvec4 o0 = mix(i0, i1, i2);\n");
    }

    #[test]
    fn short_input_list_emits_nothing() {
        let clamp = ClampGenerator { ty: PortType::Float };
        assert_eq!(clamp.emit_statement(1, &vars("i", 2), &vars("o", 1)), "");
    }
}
