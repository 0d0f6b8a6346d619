//! Compiles visual shader node graphs into GLSL fragment shader source.
//!
//! This crate is organized into several modules:
//! - `port`: Port types and connection compatibility
//! - `graph`: Nodes, connections and the two connection indexes
//! - `node_compiler`: Node kinds and the code generator for each
//! - `compiler`: Dependency-ordered traversal and source assembly
//! - `preview`: Color wrapper used when previewing a single port
//! - `document`: JSON graph documents handed over by the editor
//!
//! The main entry points are:
//! - `compile_shader`: Generate source for the whole graph
//! - `compile_preview`: Generate source showing one node output as a color

pub mod compiler;
pub mod document;
pub mod error;
pub mod graph;
pub mod node_compiler;
pub mod port;
pub mod preview;

pub use compiler::{compile_preview, compile_shader};
pub use error::{CompileError, GraphError};
pub use graph::{Connection, Connections, Endpoint, NodeId, PortIndex, ShaderGraph};
pub use node_compiler::{NodeGenerator, NodeKind};
pub use port::{PortType, connection_allowed};
