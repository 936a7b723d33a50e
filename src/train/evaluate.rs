use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::network::network::{argmax, Network};

/// Cost and accuracy of a network over a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub mean_cost: f64,
    /// Fraction of samples whose highest-scoring class matches the label, in [0, 1].
    pub accuracy: f64,
}

/// Forward-only pass over every sample; parameters are left unchanged.
pub fn evaluate(network: &mut Network, dataset: &Dataset) -> Result<Evaluation> {
    let n = dataset.len();
    if n == 0 {
        return Ok(Evaluation { mean_cost: 0.0, accuracy: 0.0 });
    }

    let mut total_cost = 0.0;
    let mut correct = 0usize;
    for index in 0..n {
        let scores = network.forward_sample(dataset, index)?;
        total_cost += network.cost(&dataset.one_hot(index)?)?;
        if argmax(&scores) == dataset.label(index)? {
            correct += 1;
        }
    }

    Ok(Evaluation {
        mean_cost: total_cost / n as f64,
        accuracy: correct as f64 / n as f64,
    })
}
