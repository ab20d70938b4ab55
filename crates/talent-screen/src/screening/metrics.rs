//! Evaluation metrics for the screening classifier.

use super::domain::{ClassOrder, Decision};

/// Confusion matrix over [`ClassOrder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// `counts[truth][predicted]`.
    counts: [[u32; ClassOrder::LEN]; ClassOrder::LEN],
}

impl ConfusionMatrix {
    pub fn add(&mut self, truth: Decision, predicted: Decision) {
        let cell = &mut self.counts[truth.class_index()][predicted.class_index()];
        *cell = cell.saturating_add(1);
    }

    pub fn get(&self, truth: Decision, predicted: Decision) -> u32 {
        self.counts[truth.class_index()][predicted.class_index()]
    }

    /// Rows are true classes, columns predicted classes, both in class order.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.counts.iter().map(|row| row.to_vec()).collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u64 = ClassOrder::DECISIONS
            .into_iter()
            .map(|decision| u64::from(self.get(decision, decision)))
            .sum();
        correct as f64 / total as f64
    }

    /// `TP / (TP + FN)` for one class; 0 when the class never occurs.
    pub fn recall(&self, decision: Decision) -> f64 {
        let row = &self.counts[decision.class_index()];
        let support: u32 = row.iter().sum();
        if support == 0 {
            return 0.0;
        }
        f64::from(row[decision.class_index()]) / f64::from(support)
    }
}
