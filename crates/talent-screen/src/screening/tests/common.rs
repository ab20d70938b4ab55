use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use axum::response::Response;
use serde_json::Value;

use crate::screening::dataset::{self, LabeledCandidate, SyntheticOptions};
use crate::screening::domain::{CandidateProfile, CandidateSubmission, Education, Language};
use crate::screening::encoding::LanguageVocabulary;
use crate::screening::model::{RegressionTree, TreeNode};
use crate::screening::pipeline::{PipelineConfig, TrainedPipeline};

pub(super) fn training_records() -> Vec<LabeledCandidate> {
    dataset::generate(&SyntheticOptions::default(), &LanguageVocabulary::default())
}

/// Pipeline trained once on the default synthetic dataset and shared by every test.
pub(super) fn trained_pipeline() -> Arc<TrainedPipeline> {
    static PIPELINE: OnceLock<Arc<TrainedPipeline>> = OnceLock::new();
    PIPELINE
        .get_or_init(|| {
            let pipeline = TrainedPipeline::train(&training_records(), PipelineConfig::default())
                .expect("synthetic dataset trains");
            Arc::new(pipeline)
        })
        .clone()
}

pub(super) fn languages(names: &[&str]) -> BTreeSet<Language> {
    names.iter().map(|name| Language::new(*name)).collect()
}

pub(super) fn strong_profile() -> CandidateProfile {
    CandidateProfile {
        experience_years: 5,
        education: Education::Master,
        technical_score: 85,
        soft_skill_score: 5,
        months_unemployed: 2,
        languages: languages(&["Python", "SQL"]),
    }
}

pub(super) fn weak_profile() -> CandidateProfile {
    CandidateProfile {
        experience_years: 1,
        education: Education::Bootcamp,
        technical_score: 40,
        soft_skill_score: 1,
        months_unemployed: 14,
        languages: languages(&["Java"]),
    }
}

pub(super) fn submission() -> CandidateSubmission {
    CandidateSubmission::from(&strong_profile())
}

/// Single-path tree that splits on features `0..depth` in turn.
pub(super) fn chain_tree(depth: usize) -> RegressionTree {
    let mut nodes = Vec::with_capacity(depth * 2 + 1);
    for feature in 0..depth {
        let split = nodes.len();
        nodes.push(TreeNode::Split {
            feature,
            threshold: 0.5,
            left: split + 1,
            right: split + 2,
            cover: (depth - feature + 1) as f64,
        });
        nodes.push(TreeNode::Leaf {
            value: -(feature as f64),
            cover: 1.0,
        });
    }
    nodes.push(TreeNode::Leaf {
        value: depth as f64,
        cover: 1.0,
    });
    RegressionTree::from_nodes(nodes)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
