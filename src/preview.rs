//! Wraps an arbitrary port's value as the fragment color so it can be shown as a swatch.

use crate::port::PortType;

/// Final statement of a preview shader writing `var` (of type `ty`) to `FragColor`.
pub fn preview_statement(ty: PortType, var: &str) -> String {
    match ty {
        PortType::Vec4 => format!("\tFragColor = vec4({var}.xyz, 1.0);\n"),
        _ => format!("\tFragColor = vec4(vec3({var}), 1.0);\n"),
    }
}
