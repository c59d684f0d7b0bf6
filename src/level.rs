use rand::Rng;

/// Geometric level draw: a node of level `n` is promoted to `n + 1` with
/// probability `p`, up to `max_level`.
#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator<R> {
    rand: R,
    max_level: usize,
    probability: f64,
}

impl<R> LevelGenerator<R> {
    pub(crate) fn new(rand: R, max_level: usize, probability: f64) -> Self {
        Self {
            rand,
            max_level,
            probability,
        }
    }

    pub(crate) fn max_level(&self) -> usize {
        self.max_level
    }
}

impl<R: Rng> LevelGenerator<R> {
    pub(crate) fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rand.gen_bool(self.probability) {
            level += 1;
        }
        level
    }
}
