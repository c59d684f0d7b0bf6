use crate::{ensure, Error};

/// Hard ceiling on the number of levels a list can be configured with.
pub const MAX_LEVEL_LIMIT: usize = 32;

const DEFAULT_MAX_LEVEL: usize = 16;
const DEFAULT_PROBABILITY: f64 = 0.5;

/// Construction-time settings of a [`SkipList`](crate::SkipList).
///
/// `max_level` caps the height a node can be drawn with, `probability` is the
/// chance of promoting a node one more level. When `seed` is set the level
/// generator is deterministic, otherwise it is seeded from OS entropy.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipListOptions {
    pub max_level: usize,
    pub probability: f64,
    pub seed: Option<u64>,
}

impl SkipListOptions {
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        ensure!(
            (1..=MAX_LEVEL_LIMIT).contains(&self.max_level),
            Error::InvalidMaxLevel(self.max_level)
        );
        ensure!(
            self.probability > 0.0 && self.probability < 1.0,
            Error::InvalidProbability(self.probability)
        );
        Ok(())
    }
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}
