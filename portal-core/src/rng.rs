//! Seeded pseudo-random scalar stream.
//!
//! A Lehmer (Park–Miller) multiplicative congruential generator: state over
//! the modulus 2^31 − 1 with multiplier 16807. All stochastic placement in
//! the point field draws from this stream, so a given seed reproduces the
//! exact same field for a given viewport size. State arithmetic is pure
//! integer math; the same seed yields the same sequence on every platform.

const MODULUS: i64 = 2_147_483_647;
const MULTIPLIER: i64 = 16_807;

#[derive(Clone, Debug)]
pub struct SeededRng {
    state: i64,
}

impl SeededRng {
    /// Creates a generator from an arbitrary integer seed.
    ///
    /// The seed is normalized into the valid non-zero state range
    /// `1..MODULUS`, so zero and negative seeds are fine.
    pub fn new(seed: i64) -> Self {
        let mut state = seed.rem_euclid(MODULUS);
        if state == 0 {
            state = 1;
        }
        Self { state }
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f32 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        let unit = (self.state - 1) as f64 / (MODULUS - 1) as f64;
        // The f64 -> f32 cast rounds the very top of the range up to 1.0,
        // which would escape the half-open interval.
        (unit as f32).min(1.0 - f32::EPSILON)
    }

    /// Next value in `[lo, hi)`.
    pub fn next_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }

    /// Centered jitter in `[-spread / 2, spread / 2)`.
    pub fn next_signed(&mut self, spread: f32) -> f32 {
        (self.next_unit() - 0.5) * spread
    }

    /// Next angle in `[0, 2π)`.
    pub fn next_angle(&mut self) -> f32 {
        self.next_unit() * std::f32::consts::TAU
    }
}
