use std::collections::HashMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::scenario::SecondsRange;

/// Owns the master generator and one derived stream per system name, so the
/// order in which systems first ask for randomness never changes a run.
pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        let master = &mut self.master;
        let entry = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()));
        SystemRng { inner: entry }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Sampling helpers shared by the systems.
pub trait RngExt {
    fn roll(&mut self, probability: f64) -> bool;
    fn seconds(&mut self, range: &SecondsRange) -> f64;
    fn unit_direction(&mut self) -> glam::Vec2;
}

impl<R: Rng> RngExt for R {
    fn roll(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        self.gen::<f64>() < probability
    }

    fn seconds(&mut self, range: &SecondsRange) -> f64 {
        if range.max <= range.min {
            range.min
        } else {
            self.gen_range(range.min..range.max)
        }
    }

    fn unit_direction(&mut self) -> glam::Vec2 {
        let angle = self.gen_range(0.0..std::f32::consts::TAU);
        glam::Vec2::new(angle.cos(), angle.sin())
    }
}
