use super::common::*;
use crate::screening::domain::{ClassOrder, Decision};
use crate::screening::encoding::{
    EncodingConfig, FeatureEncoder, LanguageVocabulary, TrainingSchema,
};
use crate::screening::error::{PredictionError, ScreeningError, TrainingError};
use crate::screening::explain::Explainer;
use crate::screening::model::GradientBoostedClassifier;
use crate::screening::pipeline::{PipelineConfig, TrainedPipeline};

#[test]
fn strong_candidate_is_approved_for_score_reasons() {
    let pipeline = trained_pipeline();

    let report = pipeline
        .screen_profile(&strong_profile())
        .expect("screening succeeds");

    assert_eq!(report.decision, Decision::Approved);
    let factors = report.explanation.expect("explanation available");
    assert_eq!(factors.len(), 3);
    assert!(
        matches!(
            factors[0].column.as_str(),
            "technical_score" | "soft_skill_score"
        ),
        "unexpected top factor {:?}",
        factors[0]
    );
    assert!(factors[0].attribution > 0.0);
    assert!(report.explanation_error.is_none());
}

#[test]
fn weak_candidate_is_rejected() {
    let pipeline = trained_pipeline();

    let prediction = pipeline.classify(&weak_profile()).expect("classifies");

    assert_eq!(prediction.decision, Decision::Rejected);
}

#[test]
fn probabilities_cover_every_class_and_sum_to_one() {
    let pipeline = trained_pipeline();

    for profile in [strong_profile(), weak_profile()] {
        let prediction = pipeline.classify(&profile).expect("classifies");
        let total: f64 = prediction.probabilities.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(prediction
            .probabilities
            .iter()
            .all(|(_, p)| (0.0..=1.0).contains(&p)));
        let best = prediction.probabilities.get(prediction.decision);
        assert!(prediction.probabilities.iter().all(|(_, p)| p <= best));
    }
}

#[test]
fn attributions_reproduce_the_class_margin() {
    let pipeline = trained_pipeline();
    let vector = pipeline.encode(&strong_profile()).expect("encodes");

    for decision in ClassOrder::DECISIONS {
        let attribution = pipeline
            .attribution(&vector, decision)
            .expect("attribution succeeds");
        let margin = pipeline
            .classifier()
            .margin(decision, &vector)
            .expect("margin");

        assert_eq!(attribution.contributions.len(), pipeline.schema().len());
        assert!(
            (attribution.total() - margin).abs() < 1e-6,
            "{decision}: {} != {margin}",
            attribution.total()
        );
    }
}

#[test]
fn explanation_is_deterministic_and_ranked() {
    let pipeline = trained_pipeline();
    let vector = pipeline.encode(&weak_profile()).expect("encodes");

    let first = pipeline.explain(&vector, Decision::Rejected).expect("explains");
    let second = pipeline.explain(&vector, Decision::Rejected).expect("explains");

    assert_eq!(first, second);
    assert!(first
        .windows(2)
        .all(|pair| pair[0].attribution.abs() >= pair[1].attribution.abs()));
}

#[test]
fn explanation_uses_display_names() {
    let pipeline = trained_pipeline();
    let vector = pipeline.encode(&strong_profile()).expect("encodes");

    let factors = pipeline
        .explain(&vector, Decision::Approved)
        .expect("explains");

    for factor in factors {
        let expected = match factor.column.as_str() {
            "technical_score" => "Technical Score",
            "soft_skill_score" => "Soft Skills",
            "months_unemployed" => "Months Unemployed",
            "education" => "Education",
            other => other,
        };
        assert_eq!(factor.feature, expected);
    }
}

#[test]
fn class_order_is_stable_across_reports() {
    let pipeline = trained_pipeline();

    let report = pipeline.screen(submission()).expect("screens");

    assert_eq!(pipeline.class_order(), ClassOrder::DECISIONS);
    assert_eq!(report.class_order, ["Approved", "PartiallyApproved", "Rejected"]);
}

#[test]
fn foreign_schema_is_a_prediction_error() {
    let pipeline = trained_pipeline();
    let encoder = FeatureEncoder::default();
    let foreign = TrainingSchema::from_columns(["technical_score", "soft_skill_score"]);
    let vector = encoder
        .encode(&strong_profile(), &foreign)
        .expect("encodes");

    match pipeline.predict(&vector) {
        Err(PredictionError::FeatureCount { expected, actual }) => {
            assert_eq!(expected, pipeline.schema().len());
            assert_eq!(actual, 2);
        }
        other => panic!("expected feature count error, got {other:?}"),
    }
}

#[test]
fn unknown_education_is_rejected_input() {
    let pipeline = trained_pipeline();
    let mut submission = submission();
    submission.education = "PhD".to_string();

    let err = pipeline.screen(submission).expect_err("unknown education");

    assert!(err.is_rejected_input());
    assert!(matches!(err, ScreeningError::UnknownCategory(_)));
}

#[test]
fn empty_dataset_fails_training() {
    match TrainedPipeline::train(&[], PipelineConfig::default()) {
        Err(ScreeningError::Training(TrainingError::EmptyDataset)) => {}
        other => panic!("expected empty dataset error, got {other:?}"),
    }
}

#[test]
fn model_card_summarises_training() {
    let pipeline = trained_pipeline();
    let card = pipeline.model_card();

    assert_eq!(card.samples, 1000);
    assert_eq!(card.class_counts.values().sum::<usize>(), 1000);
    assert!(card.training_accuracy > 0.9);
    assert_eq!(
        card.confusion_matrix
            .iter()
            .flatten()
            .map(|&count| u64::from(count))
            .sum::<u64>(),
        1000
    );
    assert_eq!(
        card.class_recall.keys().copied().collect::<Vec<_>>(),
        ClassOrder::labels().to_vec()
    );
    for (label, recall) in &card.class_recall {
        assert!((0.0..=1.0).contains(recall), "{label}: {recall}");
    }
    let approved_support: u32 = card.confusion_matrix[0].iter().sum();
    let approved_recall = f64::from(card.confusion_matrix[0][0]) / f64::from(approved_support);
    assert!((card.class_recall["Approved"] - approved_recall).abs() < 1e-12);
}

#[test]
fn failed_explanation_still_returns_classification() {
    let languages: Vec<String> = (0..16).map(|index| format!("Lang{index}")).collect();
    let encoder = FeatureEncoder::new(EncodingConfig {
        languages: LanguageVocabulary::new(languages),
        ..EncodingConfig::default()
    });
    let schema = encoder.schema();
    let deep = chain_tree(17);
    let classifier = GradientBoostedClassifier::from_parts(
        schema,
        1.0,
        vec![0.0, 0.0, 0.0],
        vec![vec![deep.clone(), deep.clone(), deep]],
    );
    let pipeline = TrainedPipeline::from_parts(encoder, classifier, Explainer::default());
    let mut profile = strong_profile();
    profile.languages.clear();

    let report = pipeline.screen_profile(&profile).expect("classification succeeds");

    assert_eq!(report.decision, Decision::Approved);
    assert!(report.explanation.is_none());
    let message = report.explanation_error.expect("error reported");
    assert_eq!(
        message,
        "tree 0 splits on 17 features, more than the 16 supported"
    );
    let total: f64 = report.probabilities.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn pipeline_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TrainedPipeline>();
}
