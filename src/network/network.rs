use log::debug;
use rand::Rng;

use crate::activation::sigmoid::{sigmoid, sigmoid_derivative};
use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::gradients::{Gradients, UpdateRule};

/// Fully-connected sigmoid network over column vectors.
///
/// For a structure `[n0, n1, .., n(L-1)]`:
/// - `weights[l]`         is `(n(l+1), n(l))`
/// - `biases[l]`          is `(n(l+1), 1)` and feeds `activations[l+1]`
/// - `activations[l]`     is `(n(l), 1)`; `activations[0]` holds the raw input
/// - `pre_activations[l]` is `(n(l), 1)`; index 0 is an unused zero placeholder
///
/// Activation caches are overwritten on every forward pass. Weights and
/// biases change only through [`Network::apply_gradients`].
#[derive(Debug, Clone)]
pub struct Network {
    structure: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    activations: Vec<Matrix>,
    pre_activations: Vec<Matrix>,
    learning_rate: f64,
    update_rule: UpdateRule,
}

impl Network {
    /// Builds a network with weights drawn uniformly from `[-5, 5)` and zero biases.
    pub fn new(structure: &[usize], learning_rate: f64) -> Result<Network> {
        Network::with_rng(structure, learning_rate, &mut rand::thread_rng())
    }

    /// Same as [`Network::new`] but draws weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        structure: &[usize],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Network> {
        validate_structure(structure)?;

        let mut weights = Vec::with_capacity(structure.len() - 1);
        let mut biases = Vec::with_capacity(structure.len() - 1);
        for pair in structure.windows(2) {
            weights.push(Matrix::random(pair[1], pair[0], rng)?);
            biases.push(Matrix::zeros(pair[1], 1)?);
        }

        debug!("built network {:?} with learning rate {}", structure, learning_rate);
        Network::assemble(structure.to_vec(), weights, biases, learning_rate)
    }

    /// Builds a network around caller-supplied parameters.
    ///
    /// The structure is inferred from the weight shapes: `weights[0]` fixes the
    /// input width and each `weights[l]` must consume `weights[l-1]`'s output.
    pub fn from_parameters(
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
        learning_rate: f64,
    ) -> Result<Network> {
        if weights.is_empty() {
            return Err(Error::InvalidStructure("at least one weight matrix is required".into()));
        }
        if weights.len() != biases.len() {
            return Err(Error::InvalidStructure(format!(
                "{} weight matrices but {} bias vectors",
                weights.len(),
                biases.len()
            )));
        }

        let mut structure = vec![weights[0].cols()];
        for (l, (w, b)) in weights.iter().zip(biases.iter()).enumerate() {
            if w.cols() != structure[l] {
                return Err(Error::InvalidStructure(format!(
                    "weights[{l}] has {} columns, expected {}",
                    w.cols(),
                    structure[l]
                )));
            }
            if b.shape() != (w.rows(), 1) {
                return Err(Error::InvalidStructure(format!(
                    "biases[{l}] is {}x{}, expected {}x1",
                    b.rows(),
                    b.cols(),
                    w.rows()
                )));
            }
            structure.push(w.rows());
        }

        Network::assemble(structure, weights, biases, learning_rate)
    }

    fn assemble(
        structure: Vec<usize>,
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
        learning_rate: f64,
    ) -> Result<Network> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be positive and finite, got {learning_rate}"
            )));
        }

        let activations = structure
            .iter()
            .map(|&n| Matrix::zeros(n, 1))
            .collect::<Result<Vec<_>>>()?;
        let pre_activations = activations.clone();

        Ok(Network {
            structure,
            weights,
            biases,
            activations,
            pre_activations,
            learning_rate,
            update_rule: UpdateRule::default(),
        })
    }

    pub fn with_update_rule(mut self, update_rule: UpdateRule) -> Network {
        self.update_rule = update_rule;
        self
    }

    pub fn structure(&self) -> &[usize] {
        &self.structure
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    pub fn activations(&self) -> &[Matrix] {
        &self.activations
    }

    pub fn pre_activations(&self) -> &[Matrix] {
        &self.pre_activations
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn update_rule(&self) -> UpdateRule {
        self.update_rule
    }

    pub fn input_size(&self) -> usize {
        self.structure[0]
    }

    pub fn output_size(&self) -> usize {
        self.structure[self.structure.len() - 1]
    }

    /// Output activations from the most recent forward pass.
    pub fn output(&self) -> &Matrix {
        &self.activations[self.activations.len() - 1]
    }

    /// Forward pass; caches `Z[l]` and `activations[l]` for every layer and
    /// returns the output column.
    pub fn forward_propagate(&mut self, input: &[f64]) -> Result<&Matrix> {
        if input.len() != self.input_size() {
            return Err(Error::InvalidInput(format!(
                "input has {} values, network expects {}",
                input.len(),
                self.input_size()
            )));
        }

        self.activations[0] = Matrix::column(input)?;
        for l in 1..self.structure.len() {
            let z = self.weights[l - 1]
                .multiply(&self.activations[l - 1])?
                .add(&self.biases[l - 1])?;
            self.activations[l] = z.map(sigmoid);
            self.pre_activations[l] = z;
        }

        Ok(self.output())
    }

    /// Forward pass over sample `index` of `dataset`; returns the class scores.
    pub fn forward_sample(&mut self, dataset: &Dataset, index: usize) -> Result<Vec<f64>> {
        let input = dataset.input(index)?;
        Ok(self.forward_propagate(input)?.to_vec())
    }

    /// Index of the highest-scoring output class.
    pub fn predict(&mut self, input: &[f64]) -> Result<usize> {
        let scores = self.forward_propagate(input)?.to_vec();
        Ok(argmax(&scores))
    }

    /// Mean squared error between the current output and `target`.
    pub fn cost(&self, target: &[f64]) -> Result<f64> {
        self.check_target(target)?;
        Ok(MseLoss::loss(&self.output().to_vec(), target))
    }

    /// Reverse-mode pass over the cached activations of the last forward pass.
    ///
    /// `X[L] = 2(a[L] - t) ⊙ σ'(Z[L])`, then `X[l] = (W[l]ᵀ · X[l+1]) ⊙ σ'(Z[l])`
    /// down to layer 1. `CW[l] = X[l+1] · a[l]ᵀ`; `CB[l]` follows the update rule.
    pub fn compute_gradients(&self, target: &[f64]) -> Result<Gradients> {
        self.check_target(target)?;

        let derivatives: Vec<Matrix> = self
            .pre_activations
            .iter()
            .map(|z| z.map(sigmoid_derivative))
            .collect();
        let last = self.structure.len() - 1;

        let seed = Matrix::column(&MseLoss::derivative(&self.output().to_vec(), target))?;
        // Collected from the output backwards: X[L], X[L-1], .., X[1].
        let mut deltas = vec![seed.hadamard(&derivatives[last])?];
        for l in (1..last).rev() {
            let mut w_t = self.weights[l].clone();
            w_t.transpose();
            let downstream = &deltas[deltas.len() - 1];
            let delta = w_t.multiply(downstream)?.hadamard(&derivatives[l])?;
            deltas.push(delta);
        }
        // Now deltas[l] == X[l+1].
        deltas.reverse();

        let mut weight_grads = Vec::with_capacity(last);
        let mut bias_grads = Vec::with_capacity(last);
        for (l, delta) in deltas.into_iter().enumerate() {
            let mut a_t = self.activations[l].clone();
            a_t.transpose();
            weight_grads.push(delta.multiply(&a_t)?);

            let bias_grad = match self.update_rule {
                UpdateRule::Additive => delta,
                UpdateRule::Multiplicative => delta.hadamard(&self.biases[l])?,
            };
            bias_grads.push(bias_grad);
        }

        Ok(Gradients { weights: weight_grads, biases: bias_grads })
    }

    /// Applies one learning-rate step. Parameters are replaced only if every
    /// layer's step succeeds.
    pub fn apply_gradients(&mut self, gradients: &Gradients) -> Result<()> {
        if gradients.len() != self.weights.len() || gradients.biases.len() != self.biases.len() {
            return Err(Error::InvalidInput(format!(
                "gradients cover {} layers, network has {}",
                gradients.len(),
                self.weights.len()
            )));
        }

        let weights = self
            .weights
            .iter()
            .zip(gradients.weights.iter())
            .map(|(param, grad)| self.step(param, grad))
            .collect::<Result<Vec<_>>>()?;
        let biases = self
            .biases
            .iter()
            .zip(gradients.biases.iter())
            .map(|(param, grad)| self.step(param, grad))
            .collect::<Result<Vec<_>>>()?;

        self.weights = weights;
        self.biases = biases;
        Ok(())
    }

    fn step(&self, param: &Matrix, grad: &Matrix) -> Result<Matrix> {
        let mut delta = match self.update_rule {
            UpdateRule::Additive => grad.clone(),
            UpdateRule::Multiplicative => param.hadamard(grad)?,
        };
        delta.scalar_multiply(self.learning_rate);
        param.subtract(&delta)
    }

    /// Computes gradients against `target`, applies them, and returns them.
    /// Must follow a forward pass.
    pub fn back_propagate(&mut self, target: &[f64]) -> Result<Gradients> {
        let gradients = self.compute_gradients(target)?;
        self.apply_gradients(&gradients)?;
        Ok(gradients)
    }

    /// One full cycle: forward, cost, backward, update. Returns the cost
    /// measured before the update.
    pub fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<f64> {
        self.forward_propagate(input)?;
        let cost = self.cost(target)?;
        self.back_propagate(target)?;
        Ok(cost)
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        if target.len() != self.output_size() {
            return Err(Error::InvalidInput(format!(
                "target has {} values, output layer has {}",
                target.len(),
                self.output_size()
            )));
        }
        Ok(())
    }
}

fn validate_structure(structure: &[usize]) -> Result<()> {
    if structure.len() < 2 {
        return Err(Error::InvalidStructure(format!(
            "need at least 2 layers, got {}",
            structure.len()
        )));
    }
    if let Some(l) = structure.iter().position(|&n| n == 0) {
        return Err(Error::InvalidStructure(format!("layer {l} has zero width")));
    }
    Ok(())
}

/// Index of the maximum element in a slice.
pub(crate) fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
