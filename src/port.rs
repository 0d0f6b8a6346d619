//! Port types and the connection compatibility relation between them.

use serde::{Deserialize, Serialize};

/// Type carried by a node input or output port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    Float,
    Int,
    UInt,
    Vec2,
    Vec3,
    Vec4,
    Bool,
}

impl PortType {
    pub const ALL: [PortType; 7] = [
        PortType::Float,
        PortType::Int,
        PortType::UInt,
        PortType::Vec2,
        PortType::Vec3,
        PortType::Vec4,
        PortType::Bool,
    ];

    /// Returns the GLSL type name for this port type.
    pub fn glsl(self) -> &'static str {
        match self {
            PortType::Float => "float",
            PortType::Int => "int",
            PortType::UInt => "uint",
            PortType::Vec2 => "vec2",
            PortType::Vec3 => "vec3",
            PortType::Vec4 => "vec4",
            PortType::Bool => "bool",
        }
    }

    pub fn is_vector(self) -> bool {
        matches!(self, PortType::Vec2 | PortType::Vec3 | PortType::Vec4)
    }

    /// Number of scalar components (1 for scalars and booleans).
    pub fn components(self) -> usize {
        match self {
            PortType::Vec2 => 2,
            PortType::Vec3 => 3,
            PortType::Vec4 => 4,
            _ => 1,
        }
    }

    /// Literal used to initialise a local standing in for an unconnected input.
    pub fn default_literal(self) -> String {
        match self {
            PortType::Float => fmt_float(0.0),
            PortType::Int => "0".to_string(),
            PortType::UInt => "0u".to_string(),
            PortType::Bool => "false".to_string(),
            PortType::Vec2 | PortType::Vec3 | PortType::Vec4 => {
                let parts = vec![fmt_float(0.0); self.components()];
                format!("{}({})", self.glsl(), parts.join(", "))
            }
        }
    }
}

/// Format a float literal for GLSL with a fixed five-digit fraction.
pub fn fmt_float(v: f32) -> String {
    if v.is_finite() {
        format!("{v:.5}")
    } else {
        "0.00000".to_string()
    }
}

/// Output types a destination port of type `to` accepts.
///
/// Keyed by destination type. Every type currently accepts every other type and no
/// cast is emitted when the two sides differ.
fn accepted_sources(to: PortType) -> &'static [PortType] {
    match to {
        PortType::Float
        | PortType::Int
        | PortType::UInt
        | PortType::Vec2
        | PortType::Vec3
        | PortType::Vec4
        | PortType::Bool => &PortType::ALL,
    }
}

/// Whether an output of type `from` may drive an input of type `to`.
pub fn connection_allowed(from: PortType, to: PortType) -> bool {
    from == to || accepted_sources(to).contains(&from)
}
