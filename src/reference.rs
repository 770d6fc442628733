use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `ReferenceStream` is the source of page requests for a simulation run. Each item is a
/// reference id drawn uniformly from `[1, universe]`, and the stream ends after `length` items.
///
/// The stream owns its own seeded generator, so `restart` replays the exact same sequence. This
/// is what lets every algorithm face identical requests.
pub struct ReferenceStream {
    seed: u64,
    rng: StdRng,
    length: usize,
    universe: u32,
    pub position: usize,
}

impl ReferenceStream {
    /// Create a new `ReferenceStream`.
    ///
    /// # Arguments
    ///
    /// * `seed` - seed of the generator behind the stream.
    /// * `length` - number of references produced before the stream ends.
    /// * `universe` - largest reference id that can be produced.
    ///
    pub fn new(seed: u64, length: usize, universe: u32) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            length,
            universe,
            position: 0,
        }
    }

    /// Rewind the stream to its first reference.
    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.position = 0;
    }
}

impl Iterator for ReferenceStream {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.length {
            return None;
        }
        self.position += 1;
        Some(self.rng.gen_range(1..=self.universe))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.length - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ReferenceStream {}
