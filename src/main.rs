//! Phisheye - Interactive entry point

use std::io;

use anyhow::Context;

use phisheye::constants;
use phisheye::logic::config::AppConfig;
use phisheye::logic::console::{self, ConsoleOperator};
use phisheye::logic::dataset::DatasetStore;
use phisheye::logic::features::NetworkProbe;
use phisheye::logic::judgment::{JudgmentLoop, RetrainOutcome};
use phisheye::logic::model::{ClassifierAdapter, RandomForest};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!("Starting {} v{} ({})", constants::APP_NAME, constants::APP_VERSION, config.schema);

    let store = DatasetStore::open(&config.dataset_path, config.schema)
        .with_context(|| format!("failed to open dataset {}", config.dataset_path.display()))?;

    let adapter = ClassifierAdapter::new(RandomForest::new(config.tree_count, config.seed))
        .with_split_seed(config.seed);
    let probe = NetworkProbe::from_config(&config);

    let mut judge = JudgmentLoop::new(store, adapter, probe)?;

    // Unready until the dataset holds at least one clean row
    if let RetrainOutcome::Failed(e) = judge.retrain() {
        log::info!("Starting without a trained model: {}", e);
    }

    let stdin = io::stdin();
    let mut operator = ConsoleOperator::new(stdin.lock(), io::stdout());
    console::run_session(&mut judge, &mut operator)?;

    Ok(())
}
