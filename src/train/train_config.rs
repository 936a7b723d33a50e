use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which dataset sample each training iteration uses.
///
/// - `Fixed`     : always the same sample
/// - `Sequential`: samples in order, wrapping around at the end
/// - `Shuffled`  : a fresh permutation per pass over the data; seeded when `seed` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SampleSelection {
    Fixed { index: usize },
    #[default]
    Sequential,
    Shuffled {
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// Configuration for a `train_network` run.
///
/// # Fields
/// - `iterations`: number of single-sample forward/backward/update cycles
/// - `selection` : how each cycle picks its sample
/// - `log_every` : emit a progress line every this many iterations; 0 disables it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub iterations: usize,
    #[serde(default)]
    pub selection: SampleSelection,
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

fn default_log_every() -> usize {
    1000
}

impl TrainConfig {
    /// Sequential selection with the default log cadence.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            selection: SampleSelection::default(),
            log_every: default_log_every(),
        }
    }

    pub fn with_selection(mut self, selection: SampleSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be at least 1".into()));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `TrainConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
