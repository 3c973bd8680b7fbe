//! Deterministic synthetic profile generation.
//!
//! The bench driver and the equivalence tests need profiles of varying
//! size whose three representations hold identical logical data. We
//! synthesize the normalized form from a seeded xorshift PRNG (fully
//! reproducible, no extra dependency) and convert from there.

use super::normalized::{Frame, NormalizedProfile, Sample, StackNode};
use crate::utils::config::{LARGE_SAMPLE_COUNT, MEDIUM_SAMPLE_COUNT, SMALL_SAMPLE_COUNT};
use log::debug;
use std::collections::HashSet;

/// Profile size presets, mirroring the fixture sizes the bench exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileSize {
    Small,
    Medium,
    Large,
}

impl ProfileSize {
    pub fn sample_count(self) -> usize {
        match self {
            ProfileSize::Small => SMALL_SAMPLE_COUNT,
            ProfileSize::Medium => MEDIUM_SAMPLE_COUNT,
            ProfileSize::Large => LARGE_SAMPLE_COUNT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileSize::Small => "small",
            ProfileSize::Medium => "medium",
            ProfileSize::Large => "large",
        }
    }
}

/// Parameters for synthetic profile generation
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub sample_count: usize,
    pub category_count: usize,
    pub frame_count: usize,
    pub stack_count: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_count: SMALL_SAMPLE_COUNT,
            category_count: 6,
            frame_count: 64,
            stack_count: 512,
            max_depth: 24,
            seed: 0x5eed_cafe,
        }
    }
}

/// Well-known category names used before falling back to numbered ones
const CATEGORY_NAMES: &[&str] = &["user", "layout", "graphics", "gc", "io", "jit", "idle"];

/// Synthesize a normalized profile from the given configuration.
///
/// **Public** - entry point for the bench driver and tests
///
/// Guarantees the profile invariants: sample times monotonic
/// non-decreasing, every stack-table parent index strictly smaller than
/// its own index, all frame and category indices in bounds. Weights are
/// mostly positive with an occasional negative one, exercising the
/// signed-accumulation paths.
pub fn synthesize(config: &SynthConfig) -> NormalizedProfile {
    debug!(
        "Synthesizing profile: {} samples, {} stacks, {} frames, seed {:#x}",
        config.sample_count, config.stack_count, config.frame_count, config.seed
    );

    let mut rng = XorShift64::new(config.seed);

    let categories: Vec<String> = (0..config.category_count.max(1))
        .map(|i| match CATEGORY_NAMES.get(i) {
            Some(name) => (*name).to_string(),
            None => format!("category-{i}"),
        })
        .collect();

    let frames: Vec<Frame> = (0..config.frame_count.max(1))
        .map(|i| Frame {
            name: format!("frame_{i}"),
            category_index: (rng.next() % categories.len() as u64) as u32,
        })
        .collect();

    // Root first; every later entry picks an already-present parent, which
    // keeps the table topologically ordered. (parent, frame) pairs are kept
    // unique so that structural stack identity coincides with table-index
    // identity across all three representations.
    let stack_count = config.stack_count.max(1);
    let frame_count = frames.len();
    let mut stacks = Vec::with_capacity(stack_count);
    let mut depths = Vec::with_capacity(stack_count);
    let mut used_nodes = HashSet::new();
    stacks.push(StackNode {
        parent: None,
        frame_index: (rng.next() % frame_count as u64) as u32,
    });
    depths.push(0usize);
    for i in 1..stack_count {
        let mut parent = (rng.next() % i as u64) as usize;
        if depths[parent] + 1 > config.max_depth {
            parent = 0;
        }
        let mut frame_index = (rng.next() % frame_count as u64) as usize;
        let mut probes = 0;
        while used_nodes.contains(&(parent, frame_index)) {
            frame_index = (frame_index + 1) % frame_count;
            probes += 1;
            if probes == frame_count {
                // Every frame under this parent is taken; the newest entry
                // has no children yet, so it always has room.
                parent = i - 1;
                probes = 0;
            }
        }
        used_nodes.insert((parent, frame_index));
        stacks.push(StackNode {
            parent: Some(parent as u32),
            frame_index: frame_index as u32,
        });
        depths.push(depths[parent] + 1);
    }

    let mut samples = Vec::with_capacity(config.sample_count);
    let mut time = 0.0f64;
    for _ in 0..config.sample_count {
        time += (rng.next() % 1_000) as f64 / 250.0;
        let magnitude = 1.0 + (rng.next() % 1_000) as f64 / 100.0;
        let weight = if rng.next() % 8 == 0 { -magnitude } else { magnitude };
        samples.push(Sample {
            time,
            stack_index: (rng.next() % stacks.len() as u64) as u32,
            weight,
        });
    }

    NormalizedProfile {
        samples,
        stacks,
        frames,
        categories,
    }
}

/// Minimal xorshift64 PRNG; deterministic and plenty for fixture data
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        // Xorshift has a single absorbing zero state.
        Self { state: seed.max(1) }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}
