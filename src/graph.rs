//! Graph model: nodes, endpoints, connections and the two connection indexes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::compiler;
use crate::error::{CompileError, GraphError};
use crate::node_compiler::{self, GeneratorMap, NodeKind};
use crate::port::connection_allowed;

pub type NodeId = u32;
pub type PortIndex = u32;

/// Id reserved for the single Output node of a graph.
pub const OUTPUT_NODE_ID: NodeId = 0;

/// One side of a connection: a port on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: PortIndex,
}

impl Endpoint {
    pub fn new(node: NodeId, port: PortIndex) -> Self {
        Self { node, port }
    }

    pub fn key(self) -> ConnectionKey {
        ConnectionKey::new(self.node, self.port)
    }
}

/// Node id in the high 32 bits, port index in the low 32 bits.
///
/// Ordering by key sorts endpoints by node first, then by port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey(u64);

impl ConnectionKey {
    pub fn new(node: NodeId, port: PortIndex) -> Self {
        Self(((node as u64) << 32) | port as u64)
    }

    pub fn node(self) -> NodeId {
        (self.0 >> 32) as NodeId
    }

    pub fn port(self) -> PortIndex {
        (self.0 & 0xFFFF_FFFF) as PortIndex
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl From<Endpoint> for ConnectionKey {
    fn from(e: Endpoint) -> Self {
        e.key()
    }
}

/// Directed edge from an output port to an input port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }
}

/// Ordered map from a packed endpoint key to the connection stored under it.
///
/// Holds at most one connection per key.
#[derive(Clone, Debug, Default)]
pub struct ConnectionIndex {
    entries: BTreeMap<ConnectionKey, Connection>,
}

impl ConnectionIndex {
    pub fn get(&self, key: ConnectionKey) -> Option<&Connection> {
        self.entries.get(&key)
    }

    /// Stores `conn` under `key`, returning whatever it displaced.
    pub fn insert(&mut self, key: ConnectionKey, conn: Connection) -> Option<Connection> {
        self.entries.insert(key, conn)
    }

    pub fn remove(&mut self, key: ConnectionKey) -> Option<Connection> {
        self.entries.remove(&key)
    }

    /// All entries whose key belongs to `node`, in port order.
    pub fn for_node(&self, node: NodeId) -> impl Iterator<Item = &Connection> {
        let lo = ConnectionKey::new(node, 0);
        let hi = ConnectionKey::new(node, PortIndex::MAX);
        self.entries.range(lo..=hi).map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionKey, &Connection)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The connection set of a graph, indexed by destination and by source.
///
/// The destination index answers "what feeds this input?" and is the only one the
/// compiler reads. The source index keeps one connection per output port, so when a
/// single output fans out the most recently connected destination wins there. The
/// entry for an output port is present whenever that port drives at least one input.
#[derive(Clone, Debug, Default)]
pub struct Connections {
    by_destination: ConnectionIndex,
    by_source: ConnectionIndex,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn`, replacing any connection already feeding the same input port.
    pub fn insert(&mut self, conn: Connection) -> Option<Connection> {
        let displaced = self.by_destination.insert(conn.to.key(), conn);
        if let Some(old) = displaced {
            self.forget_source(&old);
        }
        self.by_source.insert(conn.from.key(), conn);
        displaced
    }

    /// Removes the connection feeding input port `to`.
    pub fn remove_into(&mut self, to: Endpoint) -> Option<Connection> {
        let removed = self.by_destination.remove(to.key())?;
        self.forget_source(&removed);
        Some(removed)
    }

    /// Drops `conn` from the source index. If the same output still drives another
    /// input, that connection takes its place.
    fn forget_source(&mut self, conn: &Connection) {
        let key = conn.from.key();
        if self.by_source.get(key) != Some(conn) {
            return;
        }
        self.by_source.remove(key);
        let survivor = self
            .by_destination
            .iter()
            .map(|(_, c)| *c)
            .find(|c| c.from == conn.from && c != conn);
        if let Some(survivor) = survivor {
            self.by_source.insert(key, survivor);
        }
    }

    /// Removes every connection touching `node`.
    pub fn remove_node(&mut self, node: NodeId) -> Vec<Connection> {
        let doomed: Vec<Connection> = self
            .by_destination
            .iter()
            .map(|(_, c)| *c)
            .filter(|c| c.from.node == node || c.to.node == node)
            .collect();
        for c in &doomed {
            self.remove_into(c.to);
        }
        doomed
    }

    /// The connection feeding input port `to`, if any.
    pub fn feeding(&self, to: Endpoint) -> Option<&Connection> {
        self.by_destination.get(to.key())
    }

    /// A connection driven by output port `from`, if any.
    pub fn driven_by(&self, from: Endpoint) -> Option<&Connection> {
        self.by_source.get(from.key())
    }

    pub fn by_destination(&self) -> &ConnectionIndex {
        &self.by_destination
    }

    pub fn by_source(&self) -> &ConnectionIndex {
        &self.by_source
    }

    /// All connections in destination order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.by_destination.iter().map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.by_destination.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_destination.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

pub type NodeMap = BTreeMap<NodeId, Node>;

/// An editable shader graph rooted at the Output node (id 0).
#[derive(Clone, Debug)]
pub struct ShaderGraph {
    nodes: NodeMap,
    connections: Connections,
}

impl Default for ShaderGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderGraph {
    pub fn new() -> Self {
        let mut nodes = NodeMap::new();
        nodes.insert(
            OUTPUT_NODE_ID,
            Node {
                id: OUTPUT_NODE_ID,
                kind: NodeKind::Output,
            },
        );
        Self {
            nodes,
            connections: Connections::new(),
        }
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    pub fn add_node(&mut self, id: NodeId, kind: NodeKind) -> Result<(), GraphError> {
        if id == OUTPUT_NODE_ID || matches!(kind, NodeKind::Output) {
            return Err(GraphError::ReservedId);
        }
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id, Node { id, kind });
        Ok(())
    }

    /// Removes a node together with every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        if id == OUTPUT_NODE_ID {
            return Err(GraphError::OutputRemoval);
        }
        let node = self.nodes.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        self.connections.remove_node(id);
        Ok(node)
    }

    /// Connects output port `from` to input port `to`.
    ///
    /// Returns the connection previously feeding `to`, if one was replaced.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<Option<Connection>, GraphError> {
        let src = self.node(from.node).ok_or(GraphError::UnknownNode(from.node))?;
        let dst = self.node(to.node).ok_or(GraphError::UnknownNode(to.node))?;

        let from_ty = *src
            .kind
            .output_ports()
            .get(from.port as usize)
            .ok_or(GraphError::NoSuchOutput {
                node: from.node,
                port: from.port,
            })?;
        let to_ty = *dst
            .kind
            .input_ports()
            .get(to.port as usize)
            .ok_or(GraphError::NoSuchInput {
                node: to.node,
                port: to.port,
            })?;

        if !connection_allowed(from_ty, to_ty) {
            return Err(GraphError::IncompatibleTypes {
                from: from_ty,
                to: to_ty,
            });
        }

        Ok(self.connections.insert(Connection::new(from, to)))
    }

    pub fn disconnect(&mut self, to: Endpoint) -> Option<Connection> {
        self.connections.remove_into(to)
    }

    /// Builds one generator per node for a single compile call.
    pub fn generators(&self) -> GeneratorMap {
        node_compiler::build_generators(&self.nodes)
    }

    /// `start` plus every node it transitively depends on.
    pub fn ancestors(&self, start: NodeId) -> BTreeSet<NodeId> {
        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        let mut stack: Vec<NodeId> = vec![start];
        while let Some(n) = stack.pop() {
            if !visited.insert(n) {
                continue;
            }
            for c in self.connections.by_destination().for_node(n) {
                stack.push(c.from.node);
            }
        }
        visited
    }

    pub fn compile(&self) -> Result<String, CompileError> {
        compiler::compile_shader(&self.nodes, &self.generators(), &self.connections)
    }

    pub fn compile_preview(&self, node: NodeId, port: PortIndex) -> Result<String, CompileError> {
        compiler::compile_preview(&self.nodes, &self.generators(), &self.connections, node, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_compiler::{BinaryOperator, InputKind, ScalarType, UnaryFunction};

    fn time_sin_graph() -> ShaderGraph {
        let mut g = ShaderGraph::new();
        g.add_node(1, NodeKind::Input(InputKind::Time)).unwrap();
        g.add_node(
            2,
            NodeKind::ScalarFunc {
                func: UnaryFunction::Sin,
            },
        )
        .unwrap();
        g.connect(Endpoint::new(1, 0), Endpoint::new(2, 0)).unwrap();
        g
    }

    #[test]
    fn key_packs_node_high_and_port_low() {
        let k = ConnectionKey::new(3, 7);
        assert_eq!(k.raw(), (3u64 << 32) | 7);
        assert_eq!(k.node(), 3);
        assert_eq!(k.port(), 7);
        assert!(ConnectionKey::new(1, 9) < ConnectionKey::new(2, 0));
        assert!(ConnectionKey::new(2, 0) < ConnectionKey::new(2, 1));
    }

    #[test]
    fn connect_populates_both_indexes() {
        let g = time_sin_graph();
        let c = g.connections().feeding(Endpoint::new(2, 0)).unwrap();
        assert_eq!(c.from, Endpoint::new(1, 0));
        assert_eq!(g.connections().driven_by(Endpoint::new(1, 0)), Some(c));
    }

    #[test]
    fn reconnecting_an_input_replaces_the_old_edge() {
        let mut g = time_sin_graph();
        g.add_node(3, NodeKind::Input(InputKind::Time)).unwrap();
        let old = g.connect(Endpoint::new(3, 0), Endpoint::new(2, 0)).unwrap();
        assert_eq!(old.map(|c| c.from.node), Some(1));
        assert_eq!(g.connections().len(), 1);
        assert!(g.connections().driven_by(Endpoint::new(1, 0)).is_none());
    }

    #[test]
    fn fan_out_keeps_last_destination_in_source_index() {
        let mut g = time_sin_graph();
        g.add_node(
            3,
            NodeKind::ScalarFunc {
                func: UnaryFunction::Cos,
            },
        )
        .unwrap();
        g.connect(Endpoint::new(1, 0), Endpoint::new(3, 0)).unwrap();
        assert_eq!(g.connections().len(), 2);
        let c = g.connections().driven_by(Endpoint::new(1, 0)).unwrap();
        assert_eq!(c.to.node, 3);
        assert!(g.connections().feeding(Endpoint::new(2, 0)).is_some());
    }

    #[test]
    fn disconnecting_one_fan_out_branch_keeps_the_source_driven() {
        let mut g = time_sin_graph();
        g.add_node(
            3,
            NodeKind::ScalarFunc {
                func: UnaryFunction::Cos,
            },
        )
        .unwrap();
        g.connect(Endpoint::new(1, 0), Endpoint::new(3, 0)).unwrap();

        g.disconnect(Endpoint::new(3, 0)).unwrap();
        let live = g.connections().feeding(Endpoint::new(2, 0)).copied();
        assert_eq!(live.map(|c| c.from), Some(Endpoint::new(1, 0)));
        assert_eq!(g.connections().driven_by(Endpoint::new(1, 0)).copied(), live);

        g.disconnect(Endpoint::new(2, 0)).unwrap();
        assert!(g.connections().driven_by(Endpoint::new(1, 0)).is_none());
    }

    #[test]
    fn removing_a_fan_out_destination_keeps_the_source_driven() {
        let mut g = time_sin_graph();
        g.add_node(
            3,
            NodeKind::ScalarFunc {
                func: UnaryFunction::Cos,
            },
        )
        .unwrap();
        g.connect(Endpoint::new(1, 0), Endpoint::new(3, 0)).unwrap();

        g.remove_node(3).unwrap();
        let c = g.connections().driven_by(Endpoint::new(1, 0)).unwrap();
        assert_eq!(c.to, Endpoint::new(2, 0));
    }

    #[test]
    fn invalid_ports_are_rejected() {
        let mut g = time_sin_graph();
        assert_eq!(
            g.connect(Endpoint::new(1, 1), Endpoint::new(2, 0)),
            Err(GraphError::NoSuchOutput { node: 1, port: 1 })
        );
        assert_eq!(
            g.connect(Endpoint::new(1, 0), Endpoint::new(2, 4)),
            Err(GraphError::NoSuchInput { node: 2, port: 4 })
        );
        assert_eq!(
            g.connect(Endpoint::new(9, 0), Endpoint::new(2, 0)),
            Err(GraphError::UnknownNode(9))
        );
    }

    #[test]
    fn output_id_is_reserved() {
        let mut g = ShaderGraph::new();
        assert_eq!(
            g.add_node(0, NodeKind::Input(InputKind::Uv)),
            Err(GraphError::ReservedId)
        );
        assert_eq!(g.remove_node(0), Err(GraphError::OutputRemoval));
        assert_eq!(
            g.add_node(
                4,
                NodeKind::ScalarOp {
                    op: BinaryOperator::Add,
                    scalar: ScalarType::Float
                }
            ),
            Ok(())
        );
        assert!(matches!(
            g.add_node(4, NodeKind::Input(InputKind::Uv)),
            Err(GraphError::DuplicateNode(4))
        ));
    }

    #[test]
    fn removing_a_node_drops_its_connections() {
        let mut g = time_sin_graph();
        g.connect(Endpoint::new(2, 0), Endpoint::new(0, 0)).unwrap();
        g.remove_node(2).unwrap();
        assert!(g.connections().is_empty());
        assert!(g.connections().by_source().is_empty());
    }

    #[test]
    fn ancestors_are_inclusive() {
        let mut g = time_sin_graph();
        g.connect(Endpoint::new(2, 0), Endpoint::new(0, 0)).unwrap();
        assert_eq!(g.ancestors(0), BTreeSet::from([0, 1, 2]));
        assert_eq!(g.ancestors(1), BTreeSet::from([1]));
    }
}
