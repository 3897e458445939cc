//! Evaluation metrics over encoded targets

use crate::logic::threat::Label;
use super::types::LabelMetrics;

/// Accuracy and per-label precision / recall / f1.
/// Undefined ratios (nothing predicted or no support) are reported as 0.
pub fn evaluate(label_space: &[Label], actual: &[usize], predicted: &[usize]) -> (f64, Vec<LabelMetrics>) {
    let total = actual.len().min(predicted.len());
    let pairs = actual.iter().zip(predicted.iter());

    let correct = pairs.clone().filter(|(a, p)| a == p).count();
    let accuracy = ratio(correct, total);

    let per_label = label_space
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let true_positive = pairs.clone().filter(|(a, p)| **a == index && **p == index).count();
            let predicted_count = pairs.clone().filter(|(_, p)| **p == index).count();
            let support = pairs.clone().filter(|(a, _)| **a == index).count();

            let precision = ratio(true_positive, predicted_count);
            let recall = ratio(true_positive, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            LabelMetrics {
                label: *label,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    (accuracy, per_label)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
