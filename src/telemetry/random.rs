use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)` feeding the simulator.
///
/// Sources are not probed at construction, so seeded sequences start at the
/// first tick. Every draw is range-checked instead: a value
/// outside `[0, 1)` (NaN included) fails the step with
/// [`EngineError::InvalidDraw`](crate::error::EngineError::InvalidDraw)
/// before any state changes, and the engine halts without publishing.
pub trait UnitSource: Send + 'static {
    fn next_unit(&mut self) -> f64;
}

/// [`UnitSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng + Send + 'static> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng + Send + 'static> UnitSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
