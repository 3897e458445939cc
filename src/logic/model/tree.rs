//! CART decision tree (gini impurity, binary threshold splits)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Best split found for one node
struct Candidate {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

/// Single classification tree.
///
/// Rows go left when `value <= threshold`. Nodes stop splitting when pure,
/// when fewer than `min_samples_split` rows remain, or when no feature
/// varies.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Option<Node>,
    max_features: usize,
    min_samples_split: usize,
}

impl DecisionTree {
    /// `max_features` non-constant features are examined per split
    pub fn new(max_features: usize) -> Self {
        Self {
            root: None,
            max_features: max_features.max(1),
            min_samples_split: 2,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Fit on the rows listed in `sample` (repeats allowed, as in a bootstrap)
    pub fn fit(
        &mut self,
        features: &[Vec<f32>],
        targets: &[usize],
        sample: &[usize],
        classes: usize,
        rng: &mut StdRng,
    ) {
        self.root = if sample.is_empty() || classes == 0 {
            None
        } else {
            Some(self.build(features, targets, sample.to_vec(), classes, rng))
        };
    }

    /// Predicted class index; 0 before the first fit
    pub fn predict(&self, row: &[f32]) -> usize {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0,
        };

        loop {
            match node {
                Node::Leaf { class } => return *class,
                Node::Split { feature, threshold, left, right } => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    node = if value <= *threshold { left } else { right };
                }
            }
        }
    }

    fn build(
        &self,
        features: &[Vec<f32>],
        targets: &[usize],
        rows: Vec<usize>,
        classes: usize,
        rng: &mut StdRng,
    ) -> Node {
        let counts = class_counts(targets, &rows, classes);
        let majority = argmax(&counts);

        let pure = counts.iter().filter(|c| **c > 0).count() <= 1;
        if pure || rows.len() < self.min_samples_split {
            return Node::Leaf { class: majority };
        }

        let best = match self.best_split(features, targets, &rows, &counts, rng) {
            Some(best) => best,
            None => return Node::Leaf { class: majority },
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| features[r][best.feature] <= best.threshold);

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.build(features, targets, left_rows, classes, rng)),
            right: Box::new(self.build(features, targets, right_rows, classes, rng)),
        }
    }

    fn best_split(
        &self,
        features: &[Vec<f32>],
        targets: &[usize],
        rows: &[usize],
        counts: &[usize],
        rng: &mut StdRng,
    ) -> Option<Candidate> {
        let width = features[rows[0]].len();
        let mut order: Vec<usize> = (0..width).collect();
        order.shuffle(rng);

        let mut best: Option<Candidate> = None;
        let mut examined = 0;

        for feature in order {
            if examined >= self.max_features {
                break;
            }

            let mut sorted = rows.to_vec();
            sorted.sort_by(|a, b| features[*a][feature].total_cmp(&features[*b][feature]));

            let n = sorted.len();
            let mut left = vec![0usize; counts.len()];
            let mut right = counts.to_vec();
            let mut varies = false;

            for pos in 0..n - 1 {
                let class = targets[sorted[pos]];
                left[class] += 1;
                right[class] -= 1;

                let value = features[sorted[pos]][feature];
                let next = features[sorted[pos + 1]][feature];
                if next <= value {
                    continue;
                }
                varies = true;

                let n_left = pos + 1;
                let n_right = n - n_left;
                let impurity = (n_left as f64 * gini(&left, n_left) + n_right as f64 * gini(&right, n_right))
                    / n as f64;

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(Candidate {
                        feature,
                        threshold: midpoint(value, next),
                        impurity,
                    });
                }
            }

            // Constant features do not count toward max_features
            if varies {
                examined += 1;
            }
        }

        best
    }
}

fn class_counts(targets: &[usize], rows: &[usize], classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; classes];
    for &row in rows {
        if let Some(c) = counts.get_mut(targets[row]) {
            *c += 1;
        }
    }
    counts
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / total).powi(2)).sum::<f64>()
}

/// Index of the largest count, lowest index on ties
pub(super) fn argmax(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}

fn midpoint(low: f32, high: f32) -> f32 {
    let mid = low / 2.0 + high / 2.0;
    if mid >= high || !mid.is_finite() {
        low
    } else {
        mid
    }
}
