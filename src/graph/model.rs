use std::collections::BTreeSet;

use serde_json::Value;

use crate::foundation::core::NodeId;
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::graph::node::{Node, PadDirection};
use crate::op::Operation;

/// Directed acyclic graph of operations.
///
/// Structural edits and property sets mark nodes dirty; the engine's `prepare` re-negotiates
/// formats and bounding boxes and clears the dirty set. Dispatch refuses to run on a graph with
/// pending edits.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    dirty: BTreeSet<NodeId>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node running `op` and return its id.
    pub fn add_node(&mut self, op: impl Into<Operation>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node::new(id, op.into())));
        self.dirty.insert(id);
        id
    }

    /// Remove a node, disconnecting every consumer fed by it.
    pub fn remove_node(&mut self, id: NodeId) -> PixgraphResult<Node> {
        self.node(id)?;
        for (consumer, pad) in self.consumers(id) {
            self.disconnect(consumer, pad)?;
        }
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or_else(|| unknown(id))?;
        self.dirty.insert(id);
        Ok(node)
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> PixgraphResult<&Node> {
        self.nodes
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| unknown(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> PixgraphResult<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| unknown(id))
    }

    /// Ids of live nodes in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().flatten().map(Node::id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Return `true` when the graph has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feed `producer`'s output into `consumer`'s input pad `pad`, replacing any previous
    /// producer on that pad.
    pub fn connect(&mut self, producer: NodeId, consumer: NodeId, pad: &str) -> PixgraphResult<()> {
        self.node(producer)?;
        if producer == consumer {
            return Err(PixgraphError::graph(format!(
                "cannot connect node {} to itself",
                producer.0
            )));
        }
        let node = self.node_mut(consumer)?;
        match node.pad(pad).map(|p| p.direction()) {
            Some(PadDirection::Input) => {}
            Some(PadDirection::Output) => {
                return Err(PixgraphError::graph(format!(
                    "pad {pad:?} of node {} is an output",
                    consumer.0
                )));
            }
            None => {
                return Err(PixgraphError::graph(format!(
                    "{} node {} has no pad {pad:?}",
                    node.op().name(),
                    consumer.0
                )));
            }
        }
        node.set_producer(pad, Some(producer));
        self.dirty.insert(consumer);
        Ok(())
    }

    /// Disconnect input pad `pad` of `consumer`, returning the previous producer.
    pub fn disconnect(&mut self, consumer: NodeId, pad: &str) -> PixgraphResult<Option<NodeId>> {
        let node = self.node_mut(consumer)?;
        if !node.op().has_input_pad(pad) {
            return Err(PixgraphError::graph(format!(
                "{} node {} has no input pad {pad:?}",
                node.op().name(),
                consumer.0
            )));
        }
        let previous = node.set_producer(pad, None);
        if previous.is_some() {
            self.dirty.insert(consumer);
        }
        Ok(previous)
    }

    /// Input pads fed by `producer`, as `(consumer, pad)` pairs.
    pub fn consumers(&self, producer: NodeId) -> Vec<(NodeId, &'static str)> {
        self.nodes
            .iter()
            .flatten()
            .flat_map(|n| {
                n.input_pads()
                    .filter(|p| p.producer() == Some(producer))
                    .map(|p| (n.id(), p.name()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// All parameters of a node as a JSON object.
    pub fn properties(&self, id: NodeId) -> PixgraphResult<Value> {
        self.node(id)?.op().properties()
    }

    /// Read one parameter of a node.
    pub fn property(&self, id: NodeId, key: &str) -> PixgraphResult<Value> {
        self.node(id)?.op().property(key)
    }

    /// Replace one parameter of a node. Invalid values leave the node unchanged.
    pub fn set_property(&mut self, id: NodeId, key: &str, value: Value) -> PixgraphResult<()> {
        self.node_mut(id)?.op_mut().set_property(key, value)?;
        self.dirty.insert(id);
        Ok(())
    }

    /// Return `true` when edits are pending since the last prepare.
    pub fn needs_prepare(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take the dirty set, closed over downstream consumers.
    pub(crate) fn take_dirty(&mut self) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        let mut stack: Vec<NodeId> = std::mem::take(&mut self.dirty).into_iter().collect();
        while let Some(id) = stack.pop() {
            if out.insert(id) {
                stack.extend(self.consumers(id).into_iter().map(|(c, _)| c));
            }
        }
        out
    }

    /// Live nodes ordered producers-first.
    pub(crate) fn topo_order(&self) -> PixgraphResult<Vec<NodeId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            Open,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        for root in self.node_ids() {
            if marks[root.0 as usize] != Mark::Unseen {
                continue;
            }
            // (node, index of the next input pad to visit)
            let mut stack = vec![(root, 0usize)];
            marks[root.0 as usize] = Mark::Open;
            while let Some(&(id, next)) = stack.last() {
                let pad = self.node(id)?.input_pads().nth(next).map(|p| p.producer());
                let Some(producer) = pad else {
                    marks[id.0 as usize] = Mark::Done;
                    order.push(id);
                    stack.pop();
                    continue;
                };
                let top = stack.len() - 1;
                stack[top].1 += 1;
                let Some(p) = producer else {
                    continue;
                };
                match marks[p.0 as usize] {
                    Mark::Unseen => {
                        marks[p.0 as usize] = Mark::Open;
                        stack.push((p, 0));
                    }
                    Mark::Open => {
                        return Err(PixgraphError::graph(format!("cycle through node {}", p.0)));
                    }
                    Mark::Done => {}
                }
            }
        }
        Ok(order)
    }
}

fn unknown(id: NodeId) -> PixgraphError {
    PixgraphError::graph(format!("unknown node {}", id.0))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
