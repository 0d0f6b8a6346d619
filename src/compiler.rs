//! Compilation engine: walks the graph in dependency order and assembles the
//! final shader source from each node's declarations, helpers and statements.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::error::CompileError;
use crate::graph::{Connections, Endpoint, NodeId, NodeMap, OUTPUT_NODE_ID, PortIndex};
use crate::node_compiler::output_node::FRAG_COLOR_DECLARATION;
use crate::node_compiler::{GeneratorMap, NodeKind};
use crate::preview::preview_statement;

const MAIN_OPEN: &str = "\nvoid main() {\n";
const MAIN_CLOSE: &str = "}\n\n";

/// Variable holding the value of output port `from`.
pub fn output_var(from: Endpoint) -> String {
    format!("var_from_n{}_p{}", from.node, from.port)
}

/// Local standing in for the unconnected input port `to`.
pub fn input_var(to: Endpoint) -> String {
    format!("var_to_n{}_p{}", to.node, to.port)
}

/// Compiles the whole graph rooted at the Output node.
pub fn compile_shader(
    nodes: &NodeMap,
    generators: &GeneratorMap,
    connections: &Connections,
) -> Result<String, CompileError> {
    match nodes.get(&OUTPUT_NODE_ID) {
        Some(node) if matches!(node.kind, NodeKind::Output) => {}
        _ => return Err(CompileError::MissingOutput),
    }
    if !generators.contains_key(&OUTPUT_NODE_ID) {
        return Err(CompileError::MissingOutput);
    }

    debug!(
        "compiling shader: {} node(s), {} connection(s)",
        nodes.len(),
        connections.len()
    );
    let mut asm = Assembly::new(generators, connections);
    asm.visit(OUTPUT_NODE_ID)?;
    Ok(asm.finish(""))
}

/// Compiles only the ancestors of `node` and shows output `port` as the fragment color.
pub fn compile_preview(
    nodes: &NodeMap,
    generators: &GeneratorMap,
    connections: &Connections,
    node: NodeId,
    port: PortIndex,
) -> Result<String, CompileError> {
    if !nodes.contains_key(&node) {
        return Err(CompileError::UnknownRoot(node));
    }
    let generator = generators
        .get(&node)
        .ok_or(CompileError::UnknownRoot(node))?;
    let ty = *generator
        .output_ports()
        .get(port as usize)
        .ok_or(CompileError::RootPortOutOfRange { node, port })?;

    debug!("compiling preview of {node}:{port} ({ty:?})");
    let mut asm = Assembly::new(generators, connections);
    asm.visit(node)?;
    push_unique(&mut asm.deferred, FRAG_COLOR_DECLARATION);
    let tail = preview_statement(ty, &output_var(Endpoint::new(node, port)));
    Ok(asm.finish(&tail))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Appends `text` unless the exact same text is already in `buf`.
fn push_unique(buf: &mut String, text: &str) {
    if !text.is_empty() && !buf.contains(text) {
        buf.push_str(text);
    }
}

/// Per-call traversal state. Nothing here outlives one compile.
struct Assembly<'a> {
    generators: &'a GeneratorMap,
    connections: &'a Connections,
    marks: HashMap<NodeId, Mark>,
    declarations: String,
    node_globals: String,
    helpers: String,
    /// Output node declarations, emitted right above `main()`.
    deferred: String,
    statements: String,
}

impl<'a> Assembly<'a> {
    fn new(generators: &'a GeneratorMap, connections: &'a Connections) -> Self {
        Self {
            generators,
            connections,
            marks: HashMap::new(),
            declarations: String::new(),
            node_globals: String::new(),
            helpers: String::new(),
            deferred: String::new(),
            statements: String::new(),
        }
    }

    fn input_count(&self, id: NodeId) -> usize {
        self.generators
            .get(&id)
            .map_or(0, |g| g.input_ports().len())
    }

    /// Post-order walk from `root`: every upstream node is emitted before the nodes
    /// it feeds, inputs are followed in ascending port order, and each node is
    /// emitted once.
    fn visit(&mut self, root: NodeId) -> Result<(), CompileError> {
        if self.marks.contains_key(&root) {
            return Ok(());
        }
        self.marks.insert(root, Mark::InProgress);
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (id, port) = *frame;
            if port < self.input_count(id) {
                frame.1 += 1;
                let Some(conn) = self
                    .connections
                    .feeding(Endpoint::new(id, port as PortIndex))
                else {
                    continue;
                };
                let upstream = conn.from.node;
                match self.marks.get(&upstream) {
                    Some(Mark::InProgress) => return Err(CompileError::CyclicGraph(upstream)),
                    Some(Mark::Done) => {}
                    None => {
                        self.marks.insert(upstream, Mark::InProgress);
                        stack.push((upstream, 0));
                    }
                }
            } else {
                stack.pop();
                self.emit(id);
                self.marks.insert(id, Mark::Done);
            }
        }
        Ok(())
    }

    fn emit(&mut self, id: NodeId) {
        let generators = self.generators;
        let connections = self.connections;
        let Some(generator) = generators.get(&id) else {
            warn!("node {id} has no code generator; skipping its contribution");
            return;
        };

        let mut defaults = String::new();
        let inputs: Vec<String> = generator
            .input_ports()
            .into_iter()
            .enumerate()
            .map(|(port, ty)| {
                let to = Endpoint::new(id, port as PortIndex);
                match connections.feeding(to) {
                    Some(conn) => output_var(conn.from),
                    None => {
                        let var = input_var(to);
                        defaults += &format!("\t{} {var} = {};\n", ty.glsl(), ty.default_literal());
                        var
                    }
                }
            })
            .collect();
        let outputs: Vec<String> = (0..generator.output_ports().len())
            .map(|port| output_var(Endpoint::new(id, port as PortIndex)))
            .collect();

        let global = generator.emit_global(id);
        if id == OUTPUT_NODE_ID {
            push_unique(&mut self.deferred, &global);
        } else {
            push_unique(&mut self.declarations, &global);
        }
        self.node_globals.push_str(&generator.emit_node_global(id));
        push_unique(&mut self.helpers, &generator.emit_shared_helper(id));

        trace!("emitting {}:{id}", generator.kind_name());
        self.statements += &format!("// {}:{id}\n", generator.kind_name());
        self.statements += &defaults;
        self.statements += &generator.emit_statement(id, &inputs, &outputs);
        self.statements.push('\n');
    }

    fn finish(self, tail: &str) -> String {
        let mut src = String::with_capacity(
            self.declarations.len()
                + self.node_globals.len()
                + self.helpers.len()
                + self.deferred.len()
                + self.statements.len()
                + tail.len()
                + MAIN_OPEN.len()
                + MAIN_CLOSE.len(),
        );
        src += &self.declarations;
        src += &self.node_globals;
        src += &self.helpers;
        src += &self.deferred;
        src += MAIN_OPEN;
        src += &self.statements;
        src += tail;
        src += MAIN_CLOSE;
        src
    }
}
