use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::gradients::UpdateRule;
use crate::network::network::Network;

/// Serializable description of a network before it has any weights.
///
/// Fields:
/// - `structure`    : layer widths, input first, at least two entries
/// - `learning_rate`: step size α
/// - `update_rule`  : how gradients are turned into parameter steps
/// - `seed`         : fixes the weight initialization when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub structure: Vec<usize>,
    pub learning_rate: f64,
    #[serde(default)]
    pub update_rule: UpdateRule,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    pub fn new(structure: Vec<usize>, learning_rate: f64) -> Self {
        NetworkSpec { structure, learning_rate, update_rule: UpdateRule::default(), seed: None }
    }

    /// Allocates a freshly initialized network.
    pub fn build(&self) -> Result<Network> {
        let network = match self.seed {
            Some(seed) => {
                Network::with_rng(&self.structure, self.learning_rate, &mut StdRng::seed_from_u64(seed))?
            }
            None => Network::new(&self.structure, self.learning_rate)?,
        };
        Ok(network.with_update_rule(self.update_rule))
    }

    /// Serializes this network description to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_build_is_reproducible() {
        let mut spec = NetworkSpec::new(vec![4, 3, 2], 0.05);
        spec.seed = Some(99);
        let a = spec.build().unwrap();
        let b = spec.build().unwrap();
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.learning_rate(), 0.05);
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("sigmoid-nn-spec-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let mut spec = NetworkSpec::new(vec![784, 16, 10], 0.1);
        spec.update_rule = UpdateRule::Multiplicative;
        spec.save_json(path).unwrap();
        let loaded = NetworkSpec::load_json(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded, spec);
        assert_eq!(loaded.build().unwrap().update_rule(), UpdateRule::Multiplicative);
    }

    #[test]
    fn test_json_defaults() {
        let spec: NetworkSpec =
            serde_json::from_str(r#"{ "structure": [2, 2, 1], "learning_rate": 0.5 }"#).unwrap();
        assert_eq!(spec.update_rule, UpdateRule::Additive);
        assert_eq!(spec.seed, None);
    }
}
