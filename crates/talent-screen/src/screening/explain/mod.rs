//! Per-prediction feature attribution and top-k factor selection.

mod display;

pub use display::DisplayNames;

use serde::Serialize;

use super::domain::Decision;
use super::encoding::FeatureVector;
use super::error::ExplanationError;
use super::model::GradientBoostedClassifier;

/// One schema column's share of a class margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub column: String,
    pub value: f64,
    pub attribution: f64,
}

/// Full additive decomposition for one (instance, class) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub decision: Decision,
    /// Expected margin before any feature is observed.
    pub baseline: f64,
    /// Schema order.
    pub contributions: Vec<Contribution>,
}

impl Attribution {
    /// `baseline + sum(attributions)`, which reproduces the class margin.
    pub fn total(&self) -> f64 {
        self.baseline
            + self
                .contributions
                .iter()
                .map(|contribution| contribution.attribution)
                .sum::<f64>()
    }

    /// Contributions by descending magnitude; equal magnitudes keep schema order.
    pub fn ranked(&self) -> Vec<&Contribution> {
        let mut ranked: Vec<&Contribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| b.attribution.abs().total_cmp(&a.attribution.abs()));
        ranked
    }
}

/// Ranked factor presented to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAttribution {
    /// Display name of the column.
    pub feature: String,
    pub column: String,
    /// Encoded value the candidate had for this column.
    pub value: f64,
    pub attribution: f64,
}

/// Read-only explainer; holds only presentation settings, never model state.
#[derive(Debug, Clone)]
pub struct Explainer {
    display: DisplayNames,
    top_k: usize,
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new(DisplayNames::default(), 3)
    }
}

impl Explainer {
    pub fn new(display: DisplayNames, top_k: usize) -> Self {
        Self { display, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn display_names(&self) -> &DisplayNames {
        &self.display
    }

    pub fn attribution(
        &self,
        vector: &FeatureVector,
        predicted: Decision,
        model: &GradientBoostedClassifier,
    ) -> Result<Attribution, ExplanationError> {
        let class_attribution = model.attributions_for_class(predicted.class_index(), vector)?;
        let contributions = vector
            .iter()
            .zip(class_attribution.values)
            .map(|((column, value), attribution)| Contribution {
                column: column.to_string(),
                value,
                attribution,
            })
            .collect();

        Ok(Attribution {
            decision: predicted,
            baseline: class_attribution.baseline,
            contributions,
        })
    }

    /// The `top_k` most influential features for the predicted class.
    pub fn explain(
        &self,
        vector: &FeatureVector,
        predicted: Decision,
        model: &GradientBoostedClassifier,
    ) -> Result<Vec<FeatureAttribution>, ExplanationError> {
        let attribution = self.attribution(vector, predicted, model)?;
        Ok(attribution
            .ranked()
            .into_iter()
            .take(self.top_k)
            .map(|contribution| FeatureAttribution {
                feature: self
                    .display
                    .display_name(&contribution.column)
                    .to_string(),
                column: contribution.column.clone(),
                value: contribution.value,
                attribution: contribution.attribution,
            })
            .collect())
    }
}
