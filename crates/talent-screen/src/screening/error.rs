use thiserror::Error;

/// Raw input could not be coerced into the types a candidate profile requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A categorical value outside the vocabulary the model was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownCategoryError {
    pub field: &'static str,
    pub value: String,
}

impl UnknownCategoryError {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// A feature vector reached the classifier with a layout the model was not trained on.
///
/// This only happens when the encoder and the training schema have drifted apart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("feature vector has {actual} values but the model expects {expected}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("feature column {position} is '{actual}' but the model was trained on '{expected}'")]
    ColumnMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
    #[error("feature '{column}' is not a finite number")]
    NonFinite { column: String },
}

/// Attribution could not be computed for an instance/class pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplanationError {
    #[error("cannot explain a vector of {actual} values against a model of {expected} features")]
    FeatureCount { expected: usize, actual: usize },
    #[error("class index {0} is outside the model's class order")]
    UnknownClass(usize),
    #[error("tree {tree} splits on {features} features, more than the {limit} supported")]
    TooManyFeatures {
        tree: usize,
        features: usize,
        limit: usize,
    },
    #[error("feature column {position} is '{actual}' but the model was trained on '{expected}'")]
    ColumnMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
    #[error("feature '{column}' is not a finite number")]
    NonFiniteInput { column: String },
    #[error("attribution for '{column}' is not a finite number")]
    NonFinite { column: String },
}

impl From<PredictionError> for ExplanationError {
    fn from(value: PredictionError) -> Self {
        match value {
            PredictionError::FeatureCount { expected, actual } => {
                ExplanationError::FeatureCount { expected, actual }
            }
            PredictionError::ColumnMismatch {
                position,
                expected,
                actual,
            } => ExplanationError::ColumnMismatch {
                position,
                expected,
                actual,
            },
            PredictionError::NonFinite { column } => ExplanationError::NonFiniteInput { column },
        }
    }
}

/// Fitting the ensemble failed before any tree was produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("training requires at least one labeled record")]
    EmptyDataset,
    #[error("{features} feature vectors but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
    #[error("row {row} was encoded against a different schema than row 0")]
    SchemaMismatch { row: usize },
    #[error("invalid training options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Encoding(#[from] UnknownCategoryError),
}

/// Reading or writing labeled candidate datasets failed.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset row {row} rejected: {source}")]
    Record {
        row: usize,
        #[source]
        source: Box<ScreeningError>,
    },
}

/// Every failure the screening core can surface to a caller.
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Explanation(#[from] ExplanationError),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl ScreeningError {
    /// Whether the caller sent something the core refuses, as opposed to an internal failure.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            ScreeningError::Validation(_) | ScreeningError::UnknownCategory(_)
        )
    }
}
