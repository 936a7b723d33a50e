//! Train a sigmoid classifier on an IDX image/label pair.
//!
//! Usage: cargo run --release -- --images train-images-idx3-ubyte --labels train-labels-idx1-ubyte

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use sigmoid_nn::{data::load_idx_pair, evaluate, train_network, NetworkSpec, TrainConfig};

#[derive(Parser, Debug)]
#[command(name = "sigmoid-nn")]
#[command(about = "Train a sigmoid feed-forward classifier on IDX data")]
struct Args {
    /// IDX3 image file
    #[arg(long)]
    images: String,

    /// IDX1 label file
    #[arg(long)]
    labels: String,

    /// Number of output classes
    #[arg(long, default_value = "10")]
    classes: usize,

    /// NetworkSpec JSON; overrides --hidden and --learning-rate
    #[arg(long)]
    network: Option<String>,

    /// TrainConfig JSON; overrides --iterations
    #[arg(long)]
    train: Option<String>,

    /// Hidden layer widths
    #[arg(long, value_delimiter = ',', default_value = "16,16")]
    hidden: Vec<usize>,

    /// Learning rate
    #[arg(long, default_value = "0.1")]
    learning_rate: f64,

    /// Training iterations (one sample each)
    #[arg(long, default_value = "60000")]
    iterations: usize,

    /// Use only the first N samples
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut dataset = load_idx_pair(&args.images, &args.labels, args.classes)
        .with_context(|| format!("loading {} / {}", args.images, args.labels))?;
    if let Some(limit) = args.limit {
        dataset = dataset.truncated(limit);
    }

    let spec = match &args.network {
        Some(path) => NetworkSpec::load_json(path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut structure = vec![dataset.input_size()];
            structure.extend(&args.hidden);
            structure.push(args.classes);
            NetworkSpec::new(structure, args.learning_rate)
        }
    };
    let config = match &args.train {
        Some(path) => TrainConfig::load_json(path).with_context(|| format!("reading {path}"))?,
        None => TrainConfig::new(args.iterations),
    };

    let mut network = spec.build()?;
    let report = train_network(&mut network, &dataset, &config)?;
    let eval = evaluate(&mut network, &dataset)?;

    info!("evaluation: mean cost {:.6}, accuracy {:.4}", eval.mean_cost, eval.accuracy);
    println!(
        "trained {} iterations: last cost {:.6}, dataset cost {:.6}, accuracy {:.2}%",
        report.iterations,
        report.last_cost,
        eval.mean_cost,
        eval.accuracy * 100.0
    );

    Ok(())
}
