//! Deterministic gradient-boosted tree classifier.
//!
//! Multi-class classification via softmax boosting: every round fits one depth-limited
//! regression tree per class in [`ClassOrder`]. Nodes keep their training cover so that
//! predictions can be decomposed into per-feature Shapley attributions.

mod shap;
mod train;
mod tree;

pub use train::TrainOptions;
pub use tree::{RegressionTree, TreeNode};

use serde::Serialize;

use super::domain::{ClassOrder, ClassProbabilities, Decision};
use super::encoding::{FeatureVector, TrainingSchema};
use super::error::{ExplanationError, PredictionError, TrainingError};
use shap::{accumulate_tree_shap, MAX_TREE_FEATURES};

/// Predicted decision with the probability of every class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub decision: Decision,
    pub probabilities: ClassProbabilities,
}

/// Additive decomposition of one class margin: `baseline + sum(values) == margin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassAttribution {
    pub baseline: f64,
    /// One entry per schema column.
    pub values: Vec<f64>,
}

/// Immutable multi-class tree ensemble.
#[derive(Debug, Clone)]
pub struct GradientBoostedClassifier {
    schema: TrainingSchema,
    learning_rate: f64,
    /// Initial raw logits, indexed by class order.
    init_raw: Vec<f64>,
    /// Shape: `[n_rounds][n_classes]`.
    rounds: Vec<Vec<RegressionTree>>,
}

impl GradientBoostedClassifier {
    /// Fit on encoded vectors; every vector must share the first vector's schema.
    pub fn train(
        features: &[FeatureVector],
        labels: &[Decision],
        options: &TrainOptions,
    ) -> Result<Self, TrainingError> {
        train::train_classifier(features, labels, options)
    }

    pub(crate) fn from_parts(
        schema: TrainingSchema,
        learning_rate: f64,
        init_raw: Vec<f64>,
        rounds: Vec<Vec<RegressionTree>>,
    ) -> Self {
        Self {
            schema,
            learning_rate,
            init_raw,
            rounds,
        }
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn trees_for_class(&self, class_index: usize) -> Vec<&RegressionTree> {
        self.rounds
            .iter()
            .filter_map(|round| round.get(class_index))
            .collect()
    }

    /// Raw output margins in class order.
    pub fn margins(&self, vector: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let features = self.checked_values(vector)?;
        Ok(self.raw_margins(features))
    }

    pub fn margin(&self, decision: Decision, vector: &FeatureVector) -> Result<f64, PredictionError> {
        let margins = self.margins(vector)?;
        Ok(margins[decision.class_index()])
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction, PredictionError> {
        let margins = self.margins(vector)?;
        let probs = softmax(&margins);
        let mut probabilities = [0.0; ClassOrder::LEN];
        for (slot, probability) in probabilities.iter_mut().zip(&probs) {
            *slot = *probability;
        }
        let decision = ClassOrder::decision_at(argmax(&margins)).unwrap_or(Decision::Rejected);
        Ok(Prediction {
            decision,
            probabilities: ClassProbabilities::from_class_order(probabilities),
        })
    }

    /// Shapley attribution of one class margin, independent of how trees are stored.
    pub fn attributions_for_class(
        &self,
        class_index: usize,
        vector: &FeatureVector,
    ) -> Result<ClassAttribution, ExplanationError> {
        let features = self.checked_values(vector)?;
        let Some(&init) = self.init_raw.get(class_index) else {
            return Err(ExplanationError::UnknownClass(class_index));
        };

        let mut phi = vec![0.0; features.len()];
        let mut expectation = 0.0;
        for (tree_index, tree) in self.trees_for_class(class_index).into_iter().enumerate() {
            let mut tree_phi = vec![0.0; features.len()];
            let tree_expectation = accumulate_tree_shap(tree, features, &mut tree_phi).map_err(
                |count| ExplanationError::TooManyFeatures {
                    tree: tree_index,
                    features: count,
                    limit: MAX_TREE_FEATURES,
                },
            )?;
            expectation += tree_expectation;
            for (total, value) in phi.iter_mut().zip(tree_phi) {
                *total += value;
            }
        }

        let values: Vec<f64> = phi
            .into_iter()
            .map(|value| value * self.learning_rate)
            .collect();
        if let Some(position) = values.iter().position(|value| !value.is_finite()) {
            return Err(ExplanationError::NonFinite {
                column: self.schema.columns()[position].clone(),
            });
        }

        Ok(ClassAttribution {
            baseline: init + self.learning_rate * expectation,
            values,
        })
    }

    fn checked_values<'v>(&self, vector: &'v FeatureVector) -> Result<&'v [f64], PredictionError> {
        if vector.len() != self.schema.len() {
            return Err(PredictionError::FeatureCount {
                expected: self.schema.len(),
                actual: vector.len(),
            });
        }
        if vector.schema() != &self.schema {
            let (position, expected, actual) = self
                .schema
                .columns()
                .iter()
                .zip(vector.schema().columns())
                .enumerate()
                .find(|(_, (expected, actual))| expected != actual)
                .map(|(position, (expected, actual))| (position, expected.clone(), actual.clone()))
                .unwrap_or_default();
            return Err(PredictionError::ColumnMismatch {
                position,
                expected,
                actual,
            });
        }
        if let Some((column, _)) = vector.iter().find(|(_, value)| !value.is_finite()) {
            return Err(PredictionError::NonFinite {
                column: column.to_string(),
            });
        }
        Ok(vector.values())
    }

    fn raw_margins(&self, features: &[f64]) -> Vec<f64> {
        let mut raw = self.init_raw.clone();
        for round in &self.rounds {
            for (class_idx, tree) in round.iter().enumerate() {
                raw[class_idx] += self.learning_rate * tree.predict(features);
            }
        }
        raw
    }
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f64]) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, |a, b| a.max(b));
    let mut exps = Vec::with_capacity(raw.len());
    let mut sum = 0.0f64;
    for &v in raw {
        let e = (v - max).exp();
        exps.push(e);
        sum += e;
    }
    if sum == 0.0 {
        return vec![1.0 / raw.len() as f64; raw.len()];
    }
    for v in &mut exps {
        *v /= sum;
    }
    exps
}

/// First index holding the largest value, so ties resolve toward earlier classes.
fn argmax(values: &[f64]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}
