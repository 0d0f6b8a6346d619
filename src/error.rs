//! Error types for graph editing and shader compilation.

use thiserror::Error;

use crate::graph::{NodeId, PortIndex};
use crate::port::PortType;

/// Errors produced while building or editing a [`crate::graph::ShaderGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    UnknownNode(NodeId),
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("node id 0 is reserved for the Output node")]
    ReservedId,
    #[error("the Output node cannot be removed")]
    OutputRemoval,
    #[error("node {node} has no output port {port}")]
    NoSuchOutput { node: NodeId, port: PortIndex },
    #[error("node {node} has no input port {port}")]
    NoSuchInput { node: NodeId, port: PortIndex },
    #[error("a {from:?} output cannot drive a {to:?} input")]
    IncompatibleTypes { from: PortType, to: PortType },
}

/// Errors that abort a whole compile; no partial source is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("graph has no Output node at id 0")]
    MissingOutput,
    #[error("preview root node not found: {0}")]
    UnknownRoot(NodeId),
    #[error("preview root node {node} has no output port {port}")]
    RootPortOutOfRange { node: NodeId, port: PortIndex },
    #[error("cyclic graph: node {0} depends on itself")]
    CyclicGraph(NodeId),
}
