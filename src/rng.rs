use rand::Rng;

const MULTIPLIER: u64 = 15_485_863;
const MODULUS: u64 = 2_038_074_743;

/// Deterministic pseudo-random generator with one integer of state.
///
/// Each draw advances the seed by one and maps it through a cubic residue:
/// `t = seed * 15485863 mod 2038074743`, then `t^3 mod 2038074743` scaled
/// into `[0, 1)`. Integer arithmetic throughout, so a given seed replays the
/// exact same stream on every platform. Statistical quality is modest; the
/// engine needs reproducibility, not cryptography.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    seed: u64,
}

impl SeededRng {
    /// A generator starting from `seed`.
    pub fn new(seed: u64) -> Self {
        SeededRng { seed }
    }

    /// A generator keyed from the process entropy source, for callers that
    /// did not ask for a particular seed.
    pub fn from_entropy() -> Self {
        SeededRng {
            seed: rand::rng().random(),
        }
    }

    /// Rekey the generator; the stream restarts from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// The current seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.seed = self.seed.wrapping_add(1);
        let t = self.seed.wrapping_mul(MULTIPLIER) % MODULUS;
        // Reduce between multiplications: (MODULUS - 1)^2 fits a u64, a bare
        // cube does not.
        let cubed = t * t % MODULUS * t % MODULUS;
        cubed as f64 / MODULUS as f64
    }

    /// Next value in `[0, max)`.
    pub fn next_float(&mut self, max: f64) -> f64 {
        self.next_unit() * max
    }

    /// Next integer in `[0, max)`.
    pub fn next_int(&mut self, max: u64) -> u64 {
        (self.next_unit() * max as f64).floor() as u64
    }
}
