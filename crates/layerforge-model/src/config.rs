//! Model configuration.

use layerforge_core::DEFAULT_ID_RANGE;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Settings fixed for the lifetime of a [`Model`](crate::Model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Seed for id generation. `None` draws from OS entropy; a seed makes
    /// generated ids reproducible.
    pub id_seed: Option<u64>,
    /// Range the first candidate of each generated id is drawn from.
    pub initial_id_range: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            id_seed: None,
            initial_id_range: DEFAULT_ID_RANGE,
        }
    }
}

impl ModelConfig {
    /// A config with a fixed id seed.
    pub fn seeded(seed: u64) -> Self {
        ModelConfig {
            id_seed: Some(seed),
            ..Self::default()
        }
    }

    pub(crate) fn rng(&self) -> ChaCha8Rng {
        match self.id_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
