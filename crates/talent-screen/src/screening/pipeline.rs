use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::dataset::{self, LabeledCandidate, SyntheticOptions};
use super::domain::{
    CandidateProfile, CandidateSubmission, ClassOrder, ClassProbabilities, Decision,
};
use super::encoding::{EncodingConfig, FeatureEncoder, FeatureVector, TrainingSchema};
use super::error::{ExplanationError, PredictionError, ScreeningError, TrainingError};
use super::explain::{Attribution, DisplayNames, Explainer, FeatureAttribution};
use super::metrics::ConfusionMatrix;
use super::model::{GradientBoostedClassifier, Prediction, TrainOptions};
use crate::config::ScreeningSettings;

/// Everything needed to build a [`TrainedPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub encoding: EncodingConfig,
    pub training: TrainOptions,
    pub display: DisplayNames,
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingConfig::default(),
            training: TrainOptions::default(),
            display: DisplayNames::default(),
            top_k: 3,
        }
    }
}

impl PipelineConfig {
    pub fn from_settings(settings: &ScreeningSettings) -> Self {
        Self {
            training: TrainOptions {
                rounds: settings.rounds,
                learning_rate: settings.learning_rate,
                max_depth: settings.max_depth,
                ..TrainOptions::default()
            },
            top_k: settings.top_k,
            ..Self::default()
        }
    }
}

/// Metadata recorded when the model was fit.
#[derive(Debug, Clone, Serialize)]
pub struct ModelCard {
    pub trained_at: DateTime<Utc>,
    pub samples: usize,
    pub class_counts: BTreeMap<&'static str, usize>,
    pub training_accuracy: f64,
    /// Training recall per decision label.
    pub class_recall: BTreeMap<&'static str, f64>,
    /// Rows are true classes, columns predicted classes, both in class order.
    pub confusion_matrix: Vec<Vec<u32>>,
    pub options: TrainOptions,
}

/// Response for one screening request.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub decision: Decision,
    pub probabilities: ClassProbabilities,
    pub class_order: [&'static str; ClassOrder::LEN],
    /// Missing when attribution failed; the classification still stands.
    pub explanation: Option<Vec<FeatureAttribution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_error: Option<String>,
}

/// Fitted schema, encoder, classifier, and explainer, fixed at construction.
///
/// Shared read-only between requests; nothing here mutates after `train` returns.
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    encoder: FeatureEncoder,
    schema: TrainingSchema,
    classifier: GradientBoostedClassifier,
    explainer: Explainer,
    card: ModelCard,
}

impl TrainedPipeline {
    /// Train from the configured CSV dataset, or from synthetic records when none is set.
    pub fn bootstrap(settings: &ScreeningSettings) -> Result<Self, ScreeningError> {
        let config = PipelineConfig::from_settings(settings);
        let records = match &settings.dataset {
            Some(path) => {
                info!(path = %path.display(), "loading training dataset");
                dataset::load_csv(path)?
            }
            None => {
                info!(
                    samples = settings.samples,
                    seed = settings.seed,
                    "generating synthetic training dataset"
                );
                dataset::generate(
                    &SyntheticOptions {
                        samples: settings.samples,
                        seed: settings.seed,
                    },
                    &config.encoding.languages,
                )
            }
        };
        Self::train(&records, config)
    }

    pub fn train(records: &[LabeledCandidate], config: PipelineConfig) -> Result<Self, ScreeningError> {
        let encoder = FeatureEncoder::new(config.encoding);
        let schema = encoder.schema();

        let features = records
            .iter()
            .map(|record| encoder.encode(&record.profile, &schema))
            .collect::<Result<Vec<_>, _>>()
            .map_err(TrainingError::from)?;
        let labels: Vec<Decision> = records.iter().map(|record| record.decision).collect();

        let classifier = GradientBoostedClassifier::train(&features, &labels, &config.training)?;

        let mut confusion = ConfusionMatrix::default();
        let mut class_counts: BTreeMap<&'static str, usize> =
            ClassOrder::labels().into_iter().map(|label| (label, 0)).collect();
        for (vector, &truth) in features.iter().zip(&labels) {
            let prediction = classifier.predict(vector)?;
            confusion.add(truth, prediction.decision);
            *class_counts.entry(truth.label()).or_default() += 1;
        }

        let card = ModelCard {
            trained_at: Utc::now(),
            samples: records.len(),
            class_counts,
            training_accuracy: confusion.accuracy(),
            class_recall: ClassOrder::DECISIONS
                .into_iter()
                .map(|decision| (decision.label(), confusion.recall(decision)))
                .collect(),
            confusion_matrix: confusion.rows(),
            options: config.training,
        };
        info!(
            samples = card.samples,
            accuracy = card.training_accuracy,
            rounds = card.options.rounds,
            features = schema.len(),
            "screening model trained"
        );

        Ok(Self {
            encoder,
            schema,
            classifier,
            explainer: Explainer::new(config.display, config.top_k),
            card,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        encoder: FeatureEncoder,
        classifier: GradientBoostedClassifier,
        explainer: Explainer,
    ) -> Self {
        let card = ModelCard {
            trained_at: Utc::now(),
            samples: 0,
            class_counts: BTreeMap::new(),
            training_accuracy: 0.0,
            class_recall: BTreeMap::new(),
            confusion_matrix: ConfusionMatrix::default().rows(),
            options: TrainOptions::default(),
        };
        Self {
            schema: classifier.schema().clone(),
            encoder,
            classifier,
            explainer,
            card,
        }
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    pub fn class_order(&self) -> [Decision; ClassOrder::LEN] {
        ClassOrder::DECISIONS
    }

    pub fn model_card(&self) -> &ModelCard {
        &self.card
    }

    pub fn classifier(&self) -> &GradientBoostedClassifier {
        &self.classifier
    }

    pub fn encode(&self, profile: &CandidateProfile) -> Result<FeatureVector, ScreeningError> {
        Ok(self.encoder.encode(profile, &self.schema)?)
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction, PredictionError> {
        self.classifier.predict(vector).inspect_err(|err| {
            error!(error = %err, "feature vector out of sync with the training schema");
        })
    }

    pub fn classify(&self, profile: &CandidateProfile) -> Result<Prediction, ScreeningError> {
        let vector = self.encode(profile)?;
        Ok(self.predict(&vector)?)
    }

    pub fn explain(
        &self,
        vector: &FeatureVector,
        predicted: Decision,
    ) -> Result<Vec<FeatureAttribution>, ExplanationError> {
        self.explainer.explain(vector, predicted, &self.classifier)
    }

    /// Full decomposition of the predicted class margin, not truncated to the top features.
    pub fn attribution(
        &self,
        vector: &FeatureVector,
        predicted: Decision,
    ) -> Result<Attribution, ExplanationError> {
        self.explainer.attribution(vector, predicted, &self.classifier)
    }

    /// Validate, encode, classify, and explain one submission.
    pub fn screen(&self, submission: CandidateSubmission) -> Result<ScreeningReport, ScreeningError> {
        let profile = CandidateProfile::try_from(submission)?;
        self.screen_profile(&profile)
    }

    pub fn screen_profile(&self, profile: &CandidateProfile) -> Result<ScreeningReport, ScreeningError> {
        let vector = self.encode(profile)?;
        let prediction = self.predict(&vector)?;

        let (explanation, explanation_error) = match self.explain(&vector, prediction.decision) {
            Ok(factors) => (Some(factors), None),
            Err(err) => {
                warn!(
                    error = %err,
                    decision = %prediction.decision,
                    "explanation unavailable, returning classification only"
                );
                (None, Some(err.to_string()))
            }
        };

        Ok(ScreeningReport {
            decision: prediction.decision,
            probabilities: prediction.probabilities,
            class_order: ClassOrder::labels(),
            explanation,
            explanation_error,
        })
    }
}
