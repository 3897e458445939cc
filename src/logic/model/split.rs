//! Seeded train / evaluation split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices for each partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub eval: Vec<usize>,
    /// Set when no rows could be held out; both partitions are every row
    pub evaluated_on_training_rows: bool,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * eval_percent / 100)` rows.
/// When that leaves nothing to train on, train and evaluate on all rows.
pub fn train_eval_split(n: usize, eval_percent: usize, seed: u64) -> Split {
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let eval_len = (n * eval_percent).div_ceil(100);
    if eval_len >= n {
        return Split {
            train: order.clone(),
            eval: order,
            evaluated_on_training_rows: true,
        };
    }

    let train = order.split_off(eval_len);
    Split {
        train,
        eval: order,
        evaluated_on_training_rows: false,
    }
}
