//! Candidate encoding, classification, and explanation.
//!
//! A [`TrainedPipeline`] is built once from labeled records and then shared read-only.
//! Requests flow through it as raw submission, validated profile, feature vector, class
//! probabilities, and finally a ranked list of feature attributions.

pub mod dataset;
pub mod domain;
pub mod encoding;
pub mod error;
pub mod explain;
pub mod labeling;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod router;

#[cfg(test)]
mod tests;

pub use dataset::{LabeledCandidate, SyntheticOptions};
pub use domain::{
    CandidateProfile, CandidateSubmission, ClassOrder, ClassProbabilities, Decision, Education,
    Language,
};
pub use encoding::{
    EducationOrdinals, EncodingConfig, FeatureEncoder, FeatureVector, LanguageVocabulary,
    TrainingSchema,
};
pub use error::{
    DatasetError, ExplanationError, PredictionError, ScreeningError, TrainingError,
    UnknownCategoryError, ValidationError,
};
pub use explain::{Attribution, Contribution, DisplayNames, Explainer, FeatureAttribution};
pub use metrics::ConfusionMatrix;
pub use model::{ClassAttribution, GradientBoostedClassifier, Prediction, TrainOptions};
pub use pipeline::{ModelCard, PipelineConfig, ScreeningReport, TrainedPipeline};
pub use router::screening_router;
