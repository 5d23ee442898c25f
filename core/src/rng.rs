//! Deterministic random number generation for estimated quantities.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! Student-count estimates flow through EstimateRng streams derived
//! from the single master seed the engine was constructed with.
//!
//! Each (staff, semester) record gets its own stream, seeded from
//! (master_seed XOR fnv1a(record_key)). This means:
//!   - The same record always produces the same estimates, no matter
//!     in which order analytics calls run.
//!   - Two engines built with the same seed agree on every estimate.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A deterministic RNG stream for one workload record's estimates.
pub struct EstimateRng {
    inner: Pcg64Mcg,
}

impl EstimateRng {
    /// Derive the stream for a record key from the master seed.
    pub fn for_record(master_seed: u64, record_key: &str) -> Self {
        let derived = master_seed ^ fnv1a(record_key).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Draw a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bounded jitter in [-range, +range], inclusive.
    pub fn jitter(&mut self, range: u32) -> i64 {
        let span = 2 * range as u64 + 1;
        self.next_u64_below(span) as i64 - range as i64
    }
}

fn fnv1a(s: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
