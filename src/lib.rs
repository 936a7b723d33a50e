pub mod activation;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::sigmoid::{sigmoid, sigmoid_derivative};
pub use data::dataset::Dataset;
pub use error::{Error, Result};
pub use loss::mse::MseLoss;
pub use math::matrix::Matrix;
pub use network::gradients::{Gradients, UpdateRule};
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use train::evaluate::{evaluate, Evaluation};
pub use train::train_config::{SampleSelection, TrainConfig};
pub use train::trainer::{train_network, TrainReport};
