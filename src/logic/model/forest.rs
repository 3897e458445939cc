//! Random Forest - bagged CART ensemble
//!
//! Each tree is fitted on a bootstrap sample and examines `floor(sqrt(n))`
//! features per split. Prediction is a majority vote; ties go to the lowest
//! class index. The same seed and the same data always yield the same forest.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants;
use super::tree::{argmax, DecisionTree};
use super::types::Classifier;

#[derive(Debug, Clone)]
pub struct RandomForest {
    n_estimators: usize,
    seed: u64,
    classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        Self {
            n_estimators: n_estimators.max(1),
            seed,
            classes: 0,
            trees: Vec::new(),
        }
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(constants::DEFAULT_TREE_COUNT, constants::DEFAULT_SEED)
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, features: &[Vec<f32>], targets: &[usize], classes: usize) {
        self.trees.clear();
        self.classes = classes;

        let n = features.len().min(targets.len());
        if n == 0 || classes == 0 {
            return;
        }

        let width = features[0].len();
        let max_features = ((width as f64).sqrt().floor() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(self.seed);

        for _ in 0..self.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut tree = DecisionTree::new(max_features);
            tree.fit(features, targets, &sample, classes, &mut rng);
            self.trees.push(tree);
        }

        log::debug!(
            "Fitted {} trees on {} rows x {} features ({} classes)",
            self.trees.len(),
            n,
            width,
            classes
        );
    }

    fn predict(&self, features: &[f32]) -> usize {
        let mut votes = vec![0usize; self.classes.max(1)];
        for tree in &self.trees {
            if let Some(vote) = votes.get_mut(tree.predict(features)) {
                *vote += 1;
            }
        }
        argmax(&votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f32>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for _ in 0..10 {
            x.push(vec![1.0, 1.0, 0.0]);
            y.push(1);
            x.push(vec![0.0, 0.0, 1.0]);
            y.push(0);
        }
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let mut forest = RandomForest::new(25, 42);
        forest.fit(&x, &y, 2);

        assert!(forest.is_fitted());
        assert_eq!(forest.predict(&[1.0, 1.0, 0.0]), 1);
        assert_eq!(forest.predict(&[0.0, 0.0, 1.0]), 0);
    }

    #[test]
    fn test_same_seed_same_votes() {
        let x = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
            vec![1.0, 0.0],
        ];
        let y = vec![1, 0, 1, 0, 0];

        let mut a = RandomForest::new(10, 7);
        let mut b = RandomForest::new(10, 7);
        a.fit(&x, &y, 2);
        b.fit(&x, &y, 2);

        for row in &x {
            assert_eq!(a.predict(row), b.predict(row));
        }
    }

    #[test]
    fn test_refit_replaces_trees() {
        let (x, y) = separable();
        let mut forest = RandomForest::new(5, 42);
        forest.fit(&x, &y, 2);
        forest.fit(&x, &y, 2);
        assert_eq!(forest.trees.len(), 5);

        forest.fit(&[], &[], 2);
        assert!(!forest.is_fitted());
        assert_eq!(forest.predict(&[1.0, 1.0, 0.0]), 0);
    }
}
