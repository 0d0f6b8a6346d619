//! Generator for the graph's Output node.

use super::{NodeGenerator, take};
use crate::graph::NodeId;
use crate::port::PortType;

/// Fragment output declaration. Always placed directly above `main()`.
pub const FRAG_COLOR_DECLARATION: &str = "\nout vec4 FragColor;\n";

pub struct OutputGenerator;

impl NodeGenerator for OutputGenerator {
    fn kind_name(&self) -> &'static str {
        "Output"
    }

    fn input_ports(&self) -> Vec<PortType> {
        vec![PortType::Vec4]
    }

    fn output_ports(&self) -> Vec<PortType> {
        Vec::new()
    }

    fn emit_global(&self, _id: NodeId) -> String {
        FRAG_COLOR_DECLARATION.to_string()
    }

    fn emit_statement(&self, _id: NodeId, inputs: &[String], _outputs: &[String]) -> String {
        let Some([color]) = take::<1>(inputs) else {
            return String::new();
        };
        format!("\tFragColor = {color};\n")
    }
}
