use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;

/// How bias gradients are formed and how gradients are applied to parameters.
///
/// - `Additive`      : `CB[l] = X[l+1]`; `param -= α · grad`. Standard gradient descent.
/// - `Multiplicative`: `CB[l] = X[l+1] ⊙ biases[l]`; `param -= α · (param ⊙ grad)`.
///   Each step is scaled by the parameter's own magnitude, so zero-initialized
///   biases never move under this rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    #[default]
    Additive,
    Multiplicative,
}

/// Per-layer parameter gradients from one backward pass.
///
/// `weights[l]` has the shape of the network's `weights[l]` (`CW[l]`) and
/// `biases[l]` the shape of `biases[l]` (`CB[l]`).
#[derive(Debug, Clone)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
}

impl Gradients {
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
