use std::cmp::Ordering;

use serde_json::Value;

use crate::error::MalformedTreeError;
use crate::model::{Hierarchy, HierarchyNode, NodeId, RawNode};

const DEFAULT_MAX_DEPTH: usize = 512;

/// Converts a [`RawNode`] document into a weighted, sorted [`Hierarchy`].
#[derive(Debug, Clone, Copy)]
pub struct HierarchyBuilder {
    max_depth: usize,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Builds with default limits. See [`HierarchyBuilder::build`].
pub fn build(root: &RawNode) -> Result<Hierarchy, MalformedTreeError> {
    HierarchyBuilder::default().build(root)
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest nesting accepted before the document is rejected as malformed.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sums leaf values bottom-up, computes depth and height, and orders every
    /// node's children by descending height, then descending value. Ties keep
    /// document order.
    pub fn build(&self, root: &RawNode) -> Result<Hierarchy, MalformedTreeError> {
        let mut nodes: Vec<HierarchyNode> = Vec::with_capacity(128);

        // Pre-order walk; children are pushed reversed so they pop in document order.
        let mut stack: Vec<(&RawNode, Option<NodeId>, usize, usize)> = vec![(root, None, 0, 0)];
        while let Some((raw, parent, depth, source_index)) = stack.pop() {
            if depth > self.max_depth {
                return Err(MalformedTreeError::TooDeep {
                    max_depth: self.max_depth,
                });
            }
            let branch = raw.children.as_deref().filter(|c| !c.is_empty());
            let value = match (branch, &raw.children, &raw.value) {
                (Some(_), _, _) => 0.0,
                (None, Some(_), None) => {
                    return Err(MalformedTreeError::EmptyBranch {
                        name: raw.name.clone(),
                    })
                }
                _ => leaf_value(raw)?,
            };

            let id = NodeId(nodes.len());
            nodes.push(HierarchyNode {
                id,
                parent,
                name: raw.name.clone(),
                category: raw.category.clone(),
                source_index,
                depth,
                height: 0,
                value,
                children: Vec::new(),
            });
            if let Some(pid) = parent {
                nodes[pid.0].children.push(id);
            }
            if let Some(children) = branch {
                for (i, child) in children.iter().enumerate().rev() {
                    stack.push((child, Some(id), depth + 1, i));
                }
            }
        }

        // Children always have larger ids than their parent, so a reverse sweep is post-order.
        for i in (0..nodes.len()).rev() {
            if nodes[i].children.is_empty() {
                continue;
            }
            let (value, height) = nodes[i]
                .children
                .iter()
                .map(|c| &nodes[c.0])
                .fold((0.0, 0), |(v, h), c| (v + c.value, h.max(c.height + 1)));
            nodes[i].value = value;
            nodes[i].height = height;
        }

        for i in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[i].children);
            children.sort_by(|a, b| sibling_order(&nodes[a.0], &nodes[b.0]));
            nodes[i].children = children;
        }

        let tree = Hierarchy {
            root: NodeId(0),
            nodes,
        };
        tracing::debug!(
            nodes = tree.len(),
            height = tree.root().height,
            total = tree.root().value,
            "built hierarchy"
        );
        Ok(tree)
    }
}

fn sibling_order(a: &HierarchyNode, b: &HierarchyNode) -> Ordering {
    b.height
        .cmp(&a.height)
        .then_with(|| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal))
}

fn leaf_value(raw: &RawNode) -> Result<f64, MalformedTreeError> {
    let invalid = |v: &Value| MalformedTreeError::InvalidValue {
        name: raw.name.clone(),
        value: v.to_string(),
    };
    let value = match &raw.value {
        None => {
            return Err(MalformedTreeError::MissingValue {
                name: raw.name.clone(),
            })
        }
        Some(v @ Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(v))?,
        Some(v @ Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid(v))?,
        Some(v) => return Err(invalid(v)),
    };
    if !value.is_finite() || value <= 0.0 {
        return Err(MalformedTreeError::NonPositiveValue {
            name: raw.name.clone(),
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawNode {
        RawNode::branch(
            "Kickstarter",
            vec![
                RawNode::branch(
                    "Games",
                    vec![
                        RawNode::leaf("Exploding Kittens", "Games", 8.0),
                        RawNode::leaf("Ouya", "Games", 9.0),
                    ],
                ),
                RawNode::leaf("Loose", "Misc", 100.0),
                RawNode::branch("Film", vec![RawNode::leaf("Veronica Mars", "Film", 5.0)]),
            ],
        )
    }

    #[test]
    fn test_values_and_depths() {
        let tree = build(&sample()).unwrap();
        assert_eq!(tree.root().value, 122.0);
        assert_eq!(tree.root().depth, 0);
        assert_eq!(tree.root().height, 2);
        for id in tree.leaves() {
            let leaf = tree.get(id);
            assert_eq!(leaf.height, 0);
        }
    }

    #[test]
    fn test_children_sorted_by_height_then_value() {
        let tree = build(&sample()).unwrap();
        let names: Vec<&str> = tree
            .root()
            .children
            .iter()
            .map(|&c| tree.get(c).name.as_str())
            .collect();
        // "Loose" has the largest value but height 0, so it sorts last.
        assert_eq!(names, vec!["Games", "Film", "Loose"]);

        let games = tree.get(tree.root().children[0]);
        let leaf_names: Vec<&str> = games
            .children
            .iter()
            .map(|&c| tree.get(c).name.as_str())
            .collect();
        assert_eq!(leaf_names, vec!["Ouya", "Exploding Kittens"]);
    }

    #[test]
    fn test_ties_keep_document_order() {
        let raw = RawNode::branch(
            "root",
            vec![
                RawNode::leaf("first", "c", 1.0),
                RawNode::leaf("second", "c", 1.0),
                RawNode::leaf("third", "c", 1.0),
            ],
        );
        let tree = build(&raw).unwrap();
        let names: Vec<&str> = tree.leaves().iter().map(|&id| tree.get(id).name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_top_level_names_in_dataset_order() {
        let tree = build(&sample()).unwrap();
        assert_eq!(tree.top_level_names(), vec!["Games", "Loose", "Film"]);
    }

    #[test]
    fn test_string_values_accepted() {
        let raw: RawNode = serde_json::from_str(
            r#"{"name":"root","children":[{"name":"a","category":"x","value":" 42 "}]}"#,
        )
        .unwrap();
        let tree = build(&raw).unwrap();
        assert_eq!(tree.root().value, 42.0);
    }

    #[test]
    fn test_missing_value_rejected() {
        let raw: RawNode =
            serde_json::from_str(r#"{"name":"root","children":[{"name":"a","category":"x"}]}"#)
                .unwrap();
        assert_eq!(
            build(&raw).unwrap_err(),
            MalformedTreeError::MissingValue { name: "a".into() }
        );
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let raw: RawNode = serde_json::from_str(
            r#"{"name":"root","children":[{"name":"a","value":"lots"},{"name":"b","value":true}]}"#,
        )
        .unwrap();
        assert!(matches!(
            build(&raw),
            Err(MalformedTreeError::InvalidValue { name, .. }) if name == "a"
        ));
    }

    #[test]
    fn test_non_positive_value_rejected() {
        let raw = RawNode::branch("root", vec![RawNode::leaf("zero", "c", 0.0)]);
        assert!(matches!(
            build(&raw),
            Err(MalformedTreeError::NonPositiveValue { .. })
        ));
    }

    #[test]
    fn test_empty_branch_rejected() {
        let raw = RawNode::branch("root", vec![RawNode::branch("hollow", vec![])]);
        assert_eq!(
            build(&raw).unwrap_err(),
            MalformedTreeError::EmptyBranch {
                name: "hollow".into()
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut raw = RawNode::leaf("bottom", "c", 1.0);
        for i in 0..10 {
            raw = RawNode::branch(format!("level{i}"), vec![raw]);
        }
        assert!(HierarchyBuilder::new().max_depth(10).build(&raw).is_ok());
        assert_eq!(
            HierarchyBuilder::new().max_depth(9).build(&raw).unwrap_err(),
            MalformedTreeError::TooDeep { max_depth: 9 }
        );
    }

    #[test]
    fn test_built_tree_validates() {
        let tree = build(&sample()).unwrap();
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_top_level_of_nested_leaf() {
        let tree = build(&sample()).unwrap();
        for id in tree.leaves() {
            let top = tree.get(tree.top_level_of(id));
            assert_eq!(top.depth, 1);
        }
        let loose = tree
            .leaves()
            .into_iter()
            .find(|&id| tree.get(id).name == "Loose")
            .unwrap();
        assert_eq!(tree.top_level_of(loose), loose);
    }
}
