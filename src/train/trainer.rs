use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::train_config::{SampleSelection, TrainConfig};

/// Summary of a `train_network` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub iterations: usize,
    /// Mean pre-update cost over all iterations.
    pub mean_cost: f64,
    /// Pre-update cost of the final iteration.
    pub last_cost: f64,
}

/// Yields the sample index for each iteration.
struct SampleOrder {
    selection: SampleSelection,
    len: usize,
    order: Vec<usize>,
    cursor: usize,
    rng: Option<StdRng>,
}

impl SampleOrder {
    fn new(selection: SampleSelection, len: usize) -> SampleOrder {
        let rng = match selection {
            SampleSelection::Shuffled { seed: Some(seed) } => Some(StdRng::seed_from_u64(seed)),
            SampleSelection::Shuffled { seed: None } => Some(StdRng::from_entropy()),
            _ => None,
        };
        SampleOrder { selection, len, order: (0..len).collect(), cursor: len, rng }
    }

    fn next_index(&mut self) -> usize {
        match self.selection {
            SampleSelection::Fixed { index } => index,
            SampleSelection::Sequential | SampleSelection::Shuffled { .. } => {
                if self.cursor == self.len {
                    if let Some(rng) = self.rng.as_mut() {
                        self.order.shuffle(rng);
                    }
                    self.cursor = 0;
                }
                let index = self.order[self.cursor];
                self.cursor += 1;
                index
            }
        }
    }
}

/// Runs `config.iterations` single-sample forward/backward/update cycles over
/// `dataset`, choosing samples per `config.selection`.
pub fn train_network(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<TrainReport> {
    config.validate()?;
    if dataset.is_empty() {
        return Err(Error::InvalidData("cannot train on an empty dataset".into()));
    }
    if dataset.input_size() != network.input_size() {
        return Err(Error::InvalidInput(format!(
            "dataset inputs have {} values, network expects {}",
            dataset.input_size(),
            network.input_size()
        )));
    }
    if dataset.n_classes() != network.output_size() {
        return Err(Error::InvalidInput(format!(
            "dataset has {} classes, output layer has {}",
            dataset.n_classes(),
            network.output_size()
        )));
    }
    if let SampleSelection::Fixed { index } = config.selection {
        if index >= dataset.len() {
            return Err(Error::InvalidConfig(format!(
                "fixed sample {index} out of range for {} samples",
                dataset.len()
            )));
        }
    }

    info!(
        "training {:?} for {} iterations on {} samples ({:?}, {:?})",
        network.structure(),
        config.iterations,
        dataset.len(),
        config.selection,
        network.update_rule()
    );

    let mut order = SampleOrder::new(config.selection, dataset.len());
    let mut total_cost = 0.0;
    let mut last_cost = 0.0;

    for iteration in 1..=config.iterations {
        let index = order.next_index();
        let target = dataset.one_hot(index)?;
        last_cost = network.train_step(dataset.input(index)?, &target)?;
        total_cost += last_cost;

        if !last_cost.is_finite() {
            warn!("iteration {iteration}: cost is {last_cost} on sample {index}");
        }
        if config.log_every > 0 && iteration % config.log_every == 0 {
            debug!(
                "iteration {iteration}/{}: cost = {last_cost:.6}, running mean = {:.6}",
                config.iterations,
                total_cost / iteration as f64
            );
        }
    }

    let report = TrainReport {
        iterations: config.iterations,
        mean_cost: total_cost / config.iterations as f64,
        last_cost,
    };
    info!("finished training: mean cost {:.6}, last cost {:.6}", report.mean_cost, report.last_cost);
    Ok(report)
}
