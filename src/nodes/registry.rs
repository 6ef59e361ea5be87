use std::collections::BTreeMap;

use crate::foundation::core::CancelToken;
use crate::foundation::error::{ClipError, ClipResult};
use crate::nodes::schema::{NodeInputs, NodeValue, ParamDecl};

/// Static description of a node, as advertised to the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NodeDescriptor {
    pub class_name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub inputs: Vec<ParamDecl>,
    pub return_types: Vec<&'static str>,
    /// Output nodes report to the UI instead of feeding other nodes.
    pub output_node: bool,
}

/// What a node hands back to the host.
#[derive(Clone, Debug)]
pub enum NodeOutput {
    /// Socket values, in `return_types` order.
    Values(Vec<NodeValue>),
    /// UI payload of an output node.
    Ui(serde_json::Value),
}

/// A node implementation. Inputs arrive already checked against
/// [`Node::descriptor`].
pub trait Node: Send + Sync {
    fn descriptor(&self) -> &NodeDescriptor;

    fn execute(&self, inputs: NodeInputs, cancel: &CancelToken) -> ClipResult<NodeOutput>;
}

/// Class-name keyed table of nodes, built once per process.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<&'static str, Box<dyn Node>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Class names must be unique.
    pub fn register(&mut self, node: Box<dyn Node>) -> ClipResult<()> {
        let class_name = node.descriptor().class_name;
        if self.nodes.contains_key(class_name) {
            return Err(ClipError::invalid_input(format!(
                "node class '{class_name}' is already registered"
            )));
        }
        tracing::debug!(class_name, "registered node");
        self.nodes.insert(class_name, node);
        Ok(())
    }

    pub fn get(&self, class_name: &str) -> Option<&dyn Node> {
        self.nodes.get(class_name).map(|n| n.as_ref())
    }

    pub fn display_name(&self, class_name: &str) -> Option<&'static str> {
        self.get(class_name).map(|n| n.descriptor().display_name)
    }

    /// Descriptors sorted by class name.
    pub fn descriptors(&self) -> Vec<&NodeDescriptor> {
        self.nodes.values().map(|n| n.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate `inputs` against the node's schema and run it.
    pub fn run(
        &self,
        class_name: &str,
        inputs: NodeInputs,
        cancel: &CancelToken,
    ) -> ClipResult<NodeOutput> {
        let node = self
            .get(class_name)
            .ok_or_else(|| ClipError::invalid_input(format!("unknown node class '{class_name}'")))?;
        let inputs = inputs.resolve(&node.descriptor().inputs)?;
        node.execute(inputs, cancel)
    }
}
