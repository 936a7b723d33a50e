use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sigmoid_nn::{
    evaluate, sigmoid, sigmoid_derivative, train_network, Dataset, Error, Matrix, Network,
    SampleSelection, TrainConfig, UpdateRule,
};

const LR: f64 = 0.5;

fn col(values: &[f64]) -> Matrix {
    Matrix::column(values).unwrap()
}

/// 2-2-1 network with fixed parameters:
/// W0 = [[0.1, 0.2], [0.3, 0.4]], b0 = [0.5, -0.5], W1 = [[0.6, -0.7]], b1 = [0.05]
fn fixed_network(rule: UpdateRule) -> Network {
    let w0 = Matrix::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
    let w1 = Matrix::from_rows(vec![vec![0.6, -0.7]]).unwrap();
    Network::from_parameters(vec![w0, w1], vec![col(&[0.5, -0.5]), col(&[0.05])], LR)
        .unwrap()
        .with_update_rule(rule)
}

/// Scalar walk-through of the fixed network on input [1, 0], target [1].
struct Reference {
    z1: [f64; 2],
    a1: [f64; 2],
    z2: f64,
    a2: f64,
    x2: f64,
    x1: [f64; 2],
}

fn reference() -> Reference {
    let z1 = [0.1 * 1.0 + 0.2 * 0.0 + 0.5, 0.3 * 1.0 + 0.4 * 0.0 - 0.5];
    let a1 = [sigmoid(z1[0]), sigmoid(z1[1])];
    let z2 = 0.6 * a1[0] - 0.7 * a1[1] + 0.05;
    let a2 = sigmoid(z2);
    let x2 = 2.0 * (a2 - 1.0) * sigmoid_derivative(z2);
    let x1 = [0.6 * x2 * sigmoid_derivative(z1[0]), -0.7 * x2 * sigmoid_derivative(z1[1])];
    Reference { z1, a1, z2, a2, x2, x1 }
}

#[test]
fn forward_matches_independent_computation() {
    let mut net = fixed_network(UpdateRule::Additive);
    let r = reference();
    let out = net.forward_propagate(&[1.0, 0.0]).unwrap().to_vec();

    assert_eq!(out.len(), 1);
    assert!(out[0] > 0.0 && out[0] < 1.0);
    assert_abs_diff_eq!(out[0], r.a2, epsilon = 1e-12);
    assert_abs_diff_eq!(net.pre_activations()[1].get(0, 0).unwrap(), r.z1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(net.pre_activations()[1].get(1, 0).unwrap(), r.z1[1], epsilon = 1e-12);
    assert_abs_diff_eq!(net.activations()[1].get(1, 0).unwrap(), r.a1[1], epsilon = 1e-12);
    assert_abs_diff_eq!(net.pre_activations()[2].get(0, 0).unwrap(), r.z2, epsilon = 1e-12);
    assert_abs_diff_eq!(net.cost(&[1.0]).unwrap(), (r.a2 - 1.0).powi(2), epsilon = 1e-12);
}

#[test]
fn random_two_two_one_forward_is_sigmoid_of_affine() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut net = Network::with_rng(&[2, 2, 1], 0.1, &mut rng).unwrap();
    let out = net.forward_propagate(&[1.0, 0.0]).unwrap().get(0, 0).unwrap();

    let w0 = &net.weights()[0];
    let w1 = &net.weights()[1];
    let hidden: Vec<f64> = (0..2)
        .map(|r| sigmoid(w0.get(r, 0).unwrap() * 1.0 + net.biases()[0].get(r, 0).unwrap()))
        .collect();
    let expected = sigmoid(
        w1.get(0, 0).unwrap() * hidden[0]
            + w1.get(0, 1).unwrap() * hidden[1]
            + net.biases()[1].get(0, 0).unwrap(),
    );
    assert!(out > 0.0 && out < 1.0);
    assert_abs_diff_eq!(out, expected, epsilon = 1e-12);
}

#[test]
fn additive_backprop_matches_hand_computation() {
    let mut net = fixed_network(UpdateRule::Additive);
    let r = reference();
    net.forward_propagate(&[1.0, 0.0]).unwrap();
    let grads = net.back_propagate(&[1.0]).unwrap();

    // CW[0] = X1 · [1, 0]
    let cw0 = &grads.weights[0];
    assert_abs_diff_eq!(cw0.get(0, 0).unwrap(), r.x1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(cw0.get(0, 1).unwrap(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cw0.get(1, 0).unwrap(), r.x1[1], epsilon = 1e-12);
    assert_abs_diff_eq!(cw0.get(1, 1).unwrap(), 0.0, epsilon = 1e-12);

    // CB[0] = X1
    assert_abs_diff_eq!(grads.biases[0].get(0, 0).unwrap(), r.x1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(grads.biases[0].get(1, 0).unwrap(), r.x1[1], epsilon = 1e-12);

    // CW[1] = X2 · a1ᵀ
    assert_abs_diff_eq!(grads.weights[1].get(0, 0).unwrap(), r.x2 * r.a1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(grads.weights[1].get(0, 1).unwrap(), r.x2 * r.a1[1], epsilon = 1e-12);

    // W0 -= α · CW0
    let w0 = &net.weights()[0];
    assert_abs_diff_eq!(w0.get(0, 0).unwrap(), 0.1 - LR * r.x1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(w0.get(0, 1).unwrap(), 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(w0.get(1, 0).unwrap(), 0.3 - LR * r.x1[1], epsilon = 1e-12);
    assert_abs_diff_eq!(net.biases()[0].get(1, 0).unwrap(), -0.5 - LR * r.x1[1], epsilon = 1e-12);
    assert_abs_diff_eq!(net.biases()[1].get(0, 0).unwrap(), 0.05 - LR * r.x2, epsilon = 1e-12);
}

#[test]
fn multiplicative_backprop_matches_hand_computation() {
    let mut net = fixed_network(UpdateRule::Multiplicative);
    let r = reference();
    net.forward_propagate(&[1.0, 0.0]).unwrap();
    let grads = net.back_propagate(&[1.0]).unwrap();

    // CW is independent of the update rule.
    assert_abs_diff_eq!(grads.weights[0].get(0, 0).unwrap(), r.x1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(grads.weights[0].get(1, 0).unwrap(), r.x1[1], epsilon = 1e-12);

    // CB[0] = X1 ⊙ b0
    let cb0 = &grads.biases[0];
    assert_abs_diff_eq!(cb0.get(0, 0).unwrap(), r.x1[0] * 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(cb0.get(1, 0).unwrap(), r.x1[1] * -0.5, epsilon = 1e-12);

    // W0 -= α · (W0 ⊙ CW0)
    let w0 = &net.weights()[0];
    assert_abs_diff_eq!(w0.get(0, 0).unwrap(), 0.1 - LR * 0.1 * r.x1[0], epsilon = 1e-12);
    assert_abs_diff_eq!(w0.get(1, 0).unwrap(), 0.3 - LR * 0.3 * r.x1[1], epsilon = 1e-12);
    assert_abs_diff_eq!(w0.get(1, 1).unwrap(), 0.4, epsilon = 1e-12);

    // b0 -= α · (b0 ⊙ CB0)
    let b0 = &net.biases()[0];
    assert_abs_diff_eq!(b0.get(0, 0).unwrap(), 0.5 - LR * 0.5 * (r.x1[0] * 0.5), epsilon = 1e-12);
    assert_abs_diff_eq!(b0.get(1, 0).unwrap(), -0.5 - LR * -0.5 * (r.x1[1] * -0.5), epsilon = 1e-12);
}

#[test]
fn gradients_require_matching_target() {
    let mut net = fixed_network(UpdateRule::Additive);
    net.forward_propagate(&[1.0, 0.0]).unwrap();
    assert!(matches!(net.back_propagate(&[1.0, 0.0]), Err(Error::InvalidInput(_))));
}

fn two_blob_dataset() -> Dataset {
    let inputs = vec![
        vec![0.9, 0.1, 0.8],
        vec![0.1, 0.9, 0.2],
        vec![0.8, 0.2, 0.9],
        vec![0.2, 0.8, 0.1],
        vec![1.0, 0.0, 0.7],
        vec![0.0, 1.0, 0.3],
    ];
    Dataset::new(inputs, vec![0, 1, 0, 1, 0, 1], 2).unwrap()
}

/// Seeded network with weights shrunk to [-0.5, 0.5) so training starts unsaturated.
fn small_network(structure: &[usize], learning_rate: f64, seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let net = Network::with_rng(structure, learning_rate, &mut rng).unwrap();
    let weights = net.weights().iter().map(|w| w.map(|x| x * 0.1)).collect();
    Network::from_parameters(weights, net.biases().to_vec(), learning_rate).unwrap()
}

#[test]
fn training_sequentially_separates_two_blobs() {
    let dataset = two_blob_dataset();
    let mut net = small_network(&[3, 4, 2], 1.0, 3);

    let before = evaluate(&mut net, &dataset).unwrap();
    let report = train_network(&mut net, &dataset, &TrainConfig::new(3000)).unwrap();
    let after = evaluate(&mut net, &dataset).unwrap();

    assert_eq!(report.iterations, 3000);
    assert!(after.mean_cost < before.mean_cost);
    assert_eq!(after.accuracy, 1.0);
}

#[test]
fn fixed_selection_converges_on_its_sample() {
    let dataset = two_blob_dataset();
    let mut net = small_network(&[3, 3, 2], 0.5, 8);
    let config = TrainConfig::new(500).with_selection(SampleSelection::Fixed { index: 0 });

    let report = train_network(&mut net, &dataset, &config).unwrap();
    net.forward_sample(&dataset, 0).unwrap();
    assert!(net.cost(&dataset.one_hot(0).unwrap()).unwrap() <= report.mean_cost + 1e-12);
}

#[test]
fn train_rejects_mismatched_inputs() {
    let dataset = two_blob_dataset();
    let mut wrong_width = Network::new(&[4, 2], 0.1).unwrap();
    assert!(matches!(
        train_network(&mut wrong_width, &dataset, &TrainConfig::new(1)),
        Err(Error::InvalidInput(_))
    ));

    let mut net = Network::new(&[3, 2], 0.1).unwrap();
    let config = TrainConfig::new(1).with_selection(SampleSelection::Fixed { index: 6 });
    assert!(matches!(train_network(&mut net, &dataset, &config), Err(Error::InvalidConfig(_))));
    assert!(matches!(
        train_network(&mut net, &dataset, &TrainConfig::new(0)),
        Err(Error::InvalidConfig(_))
    ));
}
