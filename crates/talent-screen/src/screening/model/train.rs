use serde::Serialize;

use super::tree::{RegressionTree, TreeNode};
use super::{softmax, GradientBoostedClassifier};
use crate::screening::domain::{ClassOrder, Decision};
use crate::screening::encoding::FeatureVector;
use crate::screening::error::TrainingError;

/// Training hyperparameters for softmax boosting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainOptions {
    /// Number of boosting rounds; each round fits one tree per class.
    pub rounds: usize,
    /// Shrinkage applied to every tree's output.
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Smallest number of training samples allowed in a leaf.
    pub min_samples_leaf: usize,
    /// L2 penalty on leaf values.
    pub l2_regularization: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 20,
            l2_regularization: 1.0,
        }
    }
}

impl TrainOptions {
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.rounds == 0 {
            return Err(TrainingError::InvalidOptions(
                "rounds must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainingError::InvalidOptions(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(TrainingError::InvalidOptions(
                "max depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainingError::InvalidOptions(
                "min samples per leaf must be at least 1".to_string(),
            ));
        }
        if !(self.l2_regularization.is_finite() && self.l2_regularization >= 0.0) {
            return Err(TrainingError::InvalidOptions(format!(
                "l2 regularization must be non-negative, got {}",
                self.l2_regularization
            )));
        }
        Ok(())
    }
}

/// Train a multi-class tree ensemble using softmax gradient boosting.
pub(crate) fn train_classifier(
    features: &[FeatureVector],
    labels: &[Decision],
    options: &TrainOptions,
) -> Result<GradientBoostedClassifier, TrainingError> {
    options.validate()?;
    if features.len() != labels.len() {
        return Err(TrainingError::LengthMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }
    let Some(first) = features.first() else {
        return Err(TrainingError::EmptyDataset);
    };
    let schema = first.schema().clone();
    if let Some(row) = features
        .iter()
        .position(|vector| vector.schema() != &schema)
    {
        return Err(TrainingError::SchemaMismatch { row });
    }

    let x: Vec<&[f64]> = features.iter().map(FeatureVector::values).collect();
    let y: Vec<usize> = labels.iter().map(|label| label.class_index()).collect();
    let n = x.len();
    let sorted = presort_features(&x, schema.len());

    let init_raw: Vec<f64> = class_priors(&y)
        .iter()
        .map(|&p| p.max(1e-6).ln())
        .collect();
    let mut raw = vec![init_raw.clone(); n];

    let mut rounds_out: Vec<Vec<RegressionTree>> = Vec::with_capacity(options.rounds);
    let mut gradients = vec![0.0f64; n];
    let mut hessians = vec![0.0f64; n];
    for _round in 0..options.rounds {
        let probs: Vec<Vec<f64>> = raw.iter().map(|r| softmax(r)).collect();

        let mut trees_for_round = Vec::with_capacity(ClassOrder::LEN);
        for class_idx in 0..ClassOrder::LEN {
            for i in 0..n {
                let target = if y[i] == class_idx { 1.0 } else { 0.0 };
                let p = probs[i][class_idx];
                gradients[i] = target - p;
                hessians[i] = (p * (1.0 - p)).max(1e-6);
            }

            let tree = TreeBuilder {
                x: &x,
                sorted: &sorted,
                gradients: &gradients,
                hessians: &hessians,
                options,
                nodes: Vec::new(),
            }
            .build();

            for i in 0..n {
                raw[i][class_idx] += options.learning_rate * tree.predict(x[i]);
            }
            trees_for_round.push(tree);
        }
        rounds_out.push(trees_for_round);
    }

    Ok(GradientBoostedClassifier::from_parts(
        schema,
        options.learning_rate,
        init_raw,
        rounds_out,
    ))
}

fn class_priors(y: &[usize]) -> Vec<f64> {
    let mut counts = vec![0usize; ClassOrder::LEN];
    for &label in y {
        if label < ClassOrder::LEN {
            counts[label] += 1;
        }
    }
    let total = y.len().max(1) as f64;
    counts.into_iter().map(|c| c as f64 / total).collect()
}

/// Sample indices ordered by value, one list per feature; computed once per training run.
fn presort_features(x: &[&[f64]], feature_len: usize) -> Vec<Vec<usize>> {
    (0..feature_len)
        .map(|feature| {
            let mut order: Vec<usize> = (0..x.len()).collect();
            order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
            order
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    gain: f64,
    feature: usize,
    threshold: f64,
}

struct TreeBuilder<'a> {
    x: &'a [&'a [f64]],
    sorted: &'a [Vec<usize>],
    gradients: &'a [f64],
    hessians: &'a [f64],
    options: &'a TrainOptions,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    fn build(mut self) -> RegressionTree {
        let mut in_node = vec![true; self.x.len()];
        let all: Vec<usize> = (0..self.x.len()).collect();
        self.grow(&all, &mut in_node, 0);
        RegressionTree::from_nodes(self.nodes)
    }

    /// Grows the subtree for `samples` and returns its node index.
    ///
    /// `in_node` is true exactly for `samples` on entry and is restored before returning.
    fn grow(&mut self, samples: &[usize], in_node: &mut [bool], depth: usize) -> usize {
        let (grad_sum, hess_sum) = samples.iter().fold((0.0, 0.0), |(g, h), &i| {
            (g + self.gradients[i], h + self.hessians[i])
        });
        let cover = samples.len() as f64;
        let index = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            value: grad_sum / (hess_sum + self.options.l2_regularization),
            cover,
        });

        if depth >= self.options.max_depth || samples.len() < 2 * self.options.min_samples_leaf {
            return index;
        }
        let Some(split) = self.best_split(samples.len(), in_node, grad_sum, hess_sum) else {
            return index;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&i| self.x[i][split.feature] <= split.threshold);

        for &i in &right {
            in_node[i] = false;
        }
        let left_index = self.grow(&left, in_node, depth + 1);
        for &i in &right {
            in_node[i] = true;
        }
        for &i in &left {
            in_node[i] = false;
        }
        let right_index = self.grow(&right, in_node, depth + 1);
        for &i in &left {
            in_node[i] = true;
        }

        self.nodes[index] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_index,
            right: right_index,
            cover,
        };
        index
    }

    fn best_split(
        &self,
        count: usize,
        in_node: &[bool],
        grad_sum: f64,
        hess_sum: f64,
    ) -> Option<BestSplit> {
        let lambda = self.options.l2_regularization;
        let min_leaf = self.options.min_samples_leaf;
        let parent_score = grad_sum * grad_sum / (hess_sum + lambda);

        let mut best: Option<BestSplit> = None;
        for (feature, order) in self.sorted.iter().enumerate() {
            let mut left_count = 0usize;
            let mut left_grad = 0.0;
            let mut left_hess = 0.0;
            let mut previous: Option<f64> = None;

            for &i in order.iter().filter(|&&i| in_node[i]) {
                let value = self.x[i][feature];
                if let Some(prev) = previous {
                    let right_count = count - left_count;
                    if value > prev && left_count >= min_leaf && right_count >= min_leaf {
                        let right_grad = grad_sum - left_grad;
                        let right_hess = hess_sum - left_hess;
                        let gain = left_grad * left_grad / (left_hess + lambda)
                            + right_grad * right_grad / (right_hess + lambda)
                            - parent_score;
                        if gain > best.map_or(1e-12, |current| current.gain) {
                            best = Some(BestSplit {
                                gain,
                                feature,
                                threshold: prev + (value - prev) / 2.0,
                            });
                        }
                    }
                }
                left_count += 1;
                left_grad += self.gradients[i];
                left_hess += self.hessians[i];
                previous = Some(value);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::encoding::TrainingSchema;

    fn vectors(rows: &[[f64; 2]]) -> Vec<FeatureVector> {
        let schema = TrainingSchema::from_columns(["signal", "noise"]);
        rows.iter()
            .map(|row| FeatureVector::from_parts(schema.clone(), row.to_vec()))
            .collect()
    }

    #[test]
    fn rejects_invalid_inputs() {
        let options = TrainOptions::default();
        assert_eq!(
            train_classifier(&[], &[], &options).err(),
            Some(TrainingError::EmptyDataset)
        );

        let features = vectors(&[[0.0, 0.0]]);
        assert_eq!(
            train_classifier(&features, &[], &options).err(),
            Some(TrainingError::LengthMismatch {
                features: 1,
                labels: 0
            })
        );

        let zero_rounds = TrainOptions {
            rounds: 0,
            ..TrainOptions::default()
        };
        assert!(matches!(
            train_classifier(&features, &[Decision::Approved], &zero_rounds),
            Err(TrainingError::InvalidOptions(_))
        ));
    }

    #[test]
    fn rejects_rows_from_another_schema() {
        let mut features = vectors(&[[0.0, 0.0], [1.0, 1.0]]);
        features.push(FeatureVector::from_parts(
            TrainingSchema::from_columns(["other", "noise"]),
            vec![2.0, 2.0],
        ));
        let labels = [Decision::Approved, Decision::Rejected, Decision::Rejected];

        assert_eq!(
            train_classifier(&features, &labels, &TrainOptions::default()).err(),
            Some(TrainingError::SchemaMismatch { row: 2 })
        );
    }

    #[test]
    fn separable_signal_is_learned() {
        let rows: Vec<[f64; 2]> = (0..60)
            .map(|i| [(i % 3) as f64, ((i * 7) % 5) as f64])
            .collect();
        let labels: Vec<Decision> = rows
            .iter()
            .map(|row| match row[0] as usize {
                0 => Decision::Approved,
                1 => Decision::PartiallyApproved,
                _ => Decision::Rejected,
            })
            .collect();
        let features = vectors(&rows);
        let options = TrainOptions {
            rounds: 30,
            learning_rate: 0.3,
            min_samples_leaf: 5,
            ..TrainOptions::default()
        };

        let model = train_classifier(&features, &labels, &options).expect("trains");

        for (vector, label) in features.iter().zip(&labels) {
            let prediction = model.predict(vector).expect("predicts");
            assert_eq!(prediction.decision, *label);
        }
        let root = &model.trees_for_class(0)[0].nodes()[0];
        assert!(matches!(root, TreeNode::Split { feature: 0, .. }));
    }
}
