//! Reproducible seeding for the layout engine.
//!
//! The seed is a 31-bit FNV-1a hash of the UTF-8 bytes of the canonical dataset
//! string from [`crate::normalize`]. It never mixes in canvas size, node count or
//! anything else outside the dataset content.

use crate::normalize::normalize;
use serde::Serialize;
use valuestream_schemas::dataset::Dataset;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const SEED_MASK: u32 = 0x7fff_ffff;

/// FNV-1a over `bytes` with 32-bit wraparound, masked to a positive 31-bit value.
pub fn fnv1a_31(bytes: &[u8]) -> u32 {
    let hash = bytes.iter().fold(FNV_OFFSET_BASIS, |acc, &byte| {
        (acc ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    });
    hash & SEED_MASK
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Seed(u32);

impl Seed {
    pub fn from_canonical(canonical: &str) -> Self {
        Seed(fnv1a_31(canonical.as_bytes()))
    }

    /// Normalizes `dataset` and hashes the result.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self::from_canonical(&normalize(dataset))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn rng(self) -> Mulberry32 {
        Mulberry32::new(self)
    }
}

/// A source of uniformly distributed floats in `[0, 1)`.
///
/// The layout engine only depends on this trait, so the generator can be swapped
/// without touching layout code.
pub trait UnitRng {
    fn next_unit(&mut self) -> f64;
}

/// mulberry32: a 32-bit state generator, fully determined by its seed.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: Seed) -> Self {
        Self { state: seed.value() }
    }
}

impl UnitRng for Mulberry32 {
    fn next_unit(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}
