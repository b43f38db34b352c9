use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MalformedTreeError;

/// A node exactly as it appears in the dataset JSON.
///
/// Internal nodes carry `children`; leaves carry `category` and `value`.
/// The published dataset encodes values as digit strings, so `value` is kept
/// as raw JSON and interpreted by the hierarchy builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    pub fn leaf(name: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            value: Some(serde_json::json!(value)),
            children: None,
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            name: name.into(),
            category: None,
            value: None,
            children: Some(children),
        }
    }

    /// True when the node has no non-empty `children` list.
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().map_or(true, |c| c.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub usize);

/// A node of the weighted tree. Immutable once the [`Hierarchy`] is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub category: Option<String>,
    /// Position among siblings in the source document.
    pub source_index: usize,
    pub depth: usize,
    pub height: usize,
    pub value: f64,
    pub children: Vec<NodeId>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed rooted tree. Node ids index into `nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hierarchy {
    pub root: NodeId,
    pub nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[self.root.0]
    }

    pub fn get(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order (parent before children, children in sorted order).
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &c in self.get(id).children.iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    /// Leaves in layout order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.pre_order()
            .into_iter()
            .filter(|&id| self.get(id).is_leaf())
            .collect()
    }

    /// The depth-1 ancestor of `id`. The root and its direct children map to themselves.
    pub fn top_level_of(&self, id: NodeId) -> NodeId {
        let mut cur = self.get(id);
        while cur.depth > 1 {
            match cur.parent {
                Some(p) => cur = self.get(p),
                None => break,
            }
        }
        cur.id
    }

    /// Direct children of the root in dataset order.
    pub fn top_level_ids(&self) -> Vec<NodeId> {
        let mut ids = self.root().children.clone();
        ids.sort_by_key(|&id| self.get(id).source_index);
        ids
    }

    pub fn top_level_names(&self) -> Vec<&str> {
        self.top_level_ids()
            .into_iter()
            .map(|id| self.get(id).name.as_str())
            .collect()
    }

    /// Walks the arena from the root and checks that every node is reached
    /// exactly once and that parent links agree with child lists.
    pub fn validate(&self) -> Result<(), MalformedTreeError> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![(self.root, None::<NodeId>)];
        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                return Err(MalformedTreeError::Cycle { node: id.0 });
            };
            if seen[id.0] || node.parent != parent {
                return Err(MalformedTreeError::Cycle { node: id.0 });
            }
            seen[id.0] = true;
            for &c in &node.children {
                stack.push((c, Some(id)));
            }
        }
        Ok(())
    }
}
