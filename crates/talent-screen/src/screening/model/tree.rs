/// Node of a regression tree, stored in a flat arena.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Split {
        /// Feature index used for the split.
        feature: usize,
        /// `value <= threshold` goes left.
        threshold: f64,
        left: usize,
        right: usize,
        /// Training samples that reached this node.
        cover: f64,
    },
    Leaf {
        value: f64,
        cover: f64,
    },
}

impl TreeNode {
    pub fn cover(&self) -> f64 {
        match self {
            TreeNode::Split { cover, .. } | TreeNode::Leaf { cover, .. } => *cover,
        }
    }
}

/// Depth-limited regression tree used as the weak learner. Node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub(crate) fn from_nodes(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Predict the leaf value for a feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Distinct split features, ascending.
    pub fn split_features(&self) -> Vec<usize> {
        let mut features: Vec<usize> = self
            .nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf { .. } => None,
            })
            .collect();
        features.sort_unstable();
        features.dedup();
        features
    }

    /// Expected output when only the features accepted by `known` are observed.
    ///
    /// Unobserved splits average both branches weighted by their training cover.
    pub fn conditional_expectation(&self, features: &[f64], known: &dyn Fn(usize) -> bool) -> f64 {
        self.expectation_from(0, features, known)
    }

    fn expectation_from(&self, index: usize, features: &[f64], known: &dyn Fn(usize) -> bool) -> f64 {
        match &self.nodes[index] {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                if known(*feature) {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    let next = if value <= *threshold { *left } else { *right };
                    return self.expectation_from(next, features, known);
                }
                let left_cover = self.nodes[*left].cover();
                let right_cover = self.nodes[*right].cover();
                let total = left_cover + right_cover;
                let left_value = self.expectation_from(*left, features, known);
                let right_value = self.expectation_from(*right, features, known);
                if total <= 0.0 {
                    return 0.5 * (left_value + right_value);
                }
                (left_cover * left_value + right_cover * right_value) / total
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_tree() -> RegressionTree {
        RegressionTree::from_nodes(vec![
            TreeNode::Split {
                feature: 1,
                threshold: 0.5,
                left: 1,
                right: 2,
                cover: 4.0,
            },
            TreeNode::Leaf {
                value: -1.0,
                cover: 3.0,
            },
            TreeNode::Split {
                feature: 0,
                threshold: 10.0,
                left: 3,
                right: 4,
                cover: 1.0,
            },
            TreeNode::Leaf {
                value: 2.0,
                cover: 1.0,
            },
            TreeNode::Leaf {
                value: 5.0,
                cover: 0.0,
            },
        ])
    }

    #[test]
    fn predict_follows_thresholds() {
        let tree = two_level_tree();
        assert_eq!(tree.predict(&[0.0, 0.5]), -1.0);
        assert_eq!(tree.predict(&[10.0, 1.0]), 2.0);
        assert_eq!(tree.predict(&[11.0, 1.0]), 5.0);
    }

    #[test]
    fn expectation_weights_unknown_branches_by_cover() {
        let tree = two_level_tree();
        let nothing_known = tree.conditional_expectation(&[11.0, 1.0], &|_| false);
        assert!((nothing_known - (3.0 * -1.0 + 1.0 * 2.0) / 4.0).abs() < 1e-12);

        let everything_known = tree.conditional_expectation(&[11.0, 1.0], &|_| true);
        assert_eq!(everything_known, tree.predict(&[11.0, 1.0]));
        assert_eq!(tree.split_features(), vec![0, 1]);
    }
}
