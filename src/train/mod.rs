pub mod evaluate;
pub mod train_config;
pub mod trainer;

pub use evaluate::{evaluate, Evaluation};
pub use train_config::{SampleSelection, TrainConfig};
pub use trainer::{train_network, TrainReport};
