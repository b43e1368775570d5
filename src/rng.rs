// src/rng.rs
//! Random Number Generation for the Path Simulator
//!
//! # Design
//!
//! The engine never touches a global random source. Every invocation is handed
//! a caller-owned generator (anything implementing [`rand::Rng`]), so:
//! 1. **Reproducibility**: same seed → bit-identical paths and statistics
//! 2. **Parallel safety**: concurrent invocations own independent streams
//!
//! # Box-Muller Transform
//!
//! Converts uniform random variables to normal distributions:
//! ```text
//! Z = √(-2ln(U₁)) * cos(2πU₂)
//! ```
//! where U₁, U₂ ~ Uniform(0,1) and Z ~ N(0,1). The paired `sin` variate is
//! not cached; each draw consumes two fresh uniforms.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::f64::consts::PI;

/// Draw a uniform value in the open interval (0, 1).
///
/// `Rng::gen::<f64>()` samples [0, 1); zero is re-drawn because `ln(0)` is
/// undefined.
pub fn open_unit_uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}

/// One standard-normal draw via the trigonometric Box-Muller form.
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = open_unit_uniform(rng);
    let u2 = open_unit_uniform(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Generate `n` independent standard-normal variates.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| box_muller(rng)).collect()
}

/// Fill an existing buffer with standard-normal variates.
///
/// Same draw order as [`generate`]; lets the simulator reuse one buffer per day.
pub fn fill_normals<R: Rng + ?Sized>(rng: &mut R, out: &mut [f64]) {
    for z in out.iter_mut() {
        *z = box_muller(rng);
    }
}

/// Counter-based RNG for reproducible, allocation-free uniform streams
///
/// # Algorithm
///
/// splitmix64 over an incrementing counter:
/// ```text
/// z = base_seed + counter
/// z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
/// z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
/// output = z ⊕ (z >> 31)
/// ```
#[derive(Debug, Clone)]
pub struct CounterRng {
    base_seed: u64,
    counter: u64,
}

fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
    z ^ (z >> 31)
}

impl CounterRng {
    pub fn new(base_seed: u64, counter: u64) -> Self {
        Self { base_seed, counter }
    }
}

impl RngCore for CounterRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        splitmix64(self.base_seed.wrapping_add(self.counter))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Derives independent, reproducible sources from one base seed
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Counter RNG for a specific request/stream
    pub fn create_counter_rng(&self, stream_id: u64) -> CounterRng {
        CounterRng::new(self.base_seed, stream_id.wrapping_shl(32))
    }

    /// Standard RNG for a specific request/stream
    ///
    /// The base seed is mixed before the stream id is folded in, so
    /// `(seed, stream)` pairs with equal sums get unrelated seeds.
    pub fn create_std_rng(&self, stream_id: u64) -> StdRng {
        StdRng::seed_from_u64(splitmix64(splitmix64(self.base_seed) ^ stream_id))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
