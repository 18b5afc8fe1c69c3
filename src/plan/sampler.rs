use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Uniform choice without replacement from a finite set
pub trait Sampler {
    /// Returns `amount` distinct positions drawn from `0..length`, in no particular order.
    ///
    /// `amount` is capped at `length`.
    fn choose(&mut self, length: usize, amount: usize) -> Vec<usize>;
}

/// [`Sampler`] backed by a small, fast random number generator
pub struct RandomSampler {
    rng: SmallRng,
}
impl RandomSampler {
    /// Seeds from the operating system unless a seed is given
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self { rng }
    }
}
impl Sampler for RandomSampler {
    fn choose(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, length, amount.min(length)).into_vec()
    }
}
