//! Generator for built-in shader inputs (UV coordinate, time).

use super::{InputKind, NodeGenerator, assign, take};
use crate::graph::NodeId;
use crate::port::PortType;

impl InputKind {
    pub fn port_type(self) -> PortType {
        match self {
            InputKind::Uv => PortType::Vec2,
            InputKind::Time => PortType::Float,
        }
    }

    /// Name of the shader-level variable backing this input.
    pub fn glsl_name(self) -> &'static str {
        match self {
            InputKind::Uv => "FragCoord",
            InputKind::Time => "uTime",
        }
    }

    fn declaration(self) -> String {
        let qualifier = match self {
            InputKind::Uv => "in",
            InputKind::Time => "uniform",
        };
        format!("{qualifier} {} {};\n", self.port_type().glsl(), self.glsl_name())
    }
}

/// Reads one built-in input.
///
/// The global block declares every built-in input, not just this node's, so all
/// Input nodes of a graph emit identical text and collapse to one copy.
pub struct InputGenerator {
    pub input: InputKind,
}

impl NodeGenerator for InputGenerator {
    fn kind_name(&self) -> &'static str {
        "Input"
    }

    fn input_ports(&self) -> Vec<PortType> {
        Vec::new()
    }

    fn output_ports(&self) -> Vec<PortType> {
        vec![self.input.port_type()]
    }

    fn emit_global(&self, _id: NodeId) -> String {
        InputKind::ALL.iter().map(|k| k.declaration()).collect()
    }

    fn emit_statement(&self, _id: NodeId, _inputs: &[String], outputs: &[String]) -> String {
        let Some([out]) = take::<1>(outputs) else {
            return String::new();
        };
        assign(self.input.port_type(), out, self.input.glsl_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_input_emits_all_declarations() {
        let uv = InputGenerator { input: InputKind::Uv };
        let time = InputGenerator {
            input: InputKind::Time,
        };
        let expected = "in vec2 FragCoord;\nuniform float uTime;\n";
        assert_eq!(uv.emit_global(4), expected);
        assert_eq!(time.emit_global(1), expected);
    }

    #[test]
    fn statements_read_the_builtin() {
        let uv = InputGenerator { input: InputKind::Uv };
        let out = vec!["var_from_n4_p0".to_string()];
        assert_eq!(
            uv.emit_statement(4, &[], &out),
            "\tvec2 var_from_n4_p0 = FragCoord;\n"
        );
        let time = InputGenerator {
            input: InputKind::Time,
        };
        assert_eq!(
            time.emit_statement(1, &[], &["t".to_string()]),
            "\tfloat t = uTime;\n"
        );
    }

    #[test]
    fn missing_output_var_emits_nothing() {
        let uv = InputGenerator { input: InputKind::Uv };
        assert_eq!(uv.emit_statement(4, &[], &[]), "");
    }
}
