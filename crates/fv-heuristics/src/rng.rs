//! Seeded random streams
//!
//! All heuristics of one request share a seed. Each one draws from its own
//! ChaCha stream selected by its name, so two heuristics never consume the
//! same random words and adding one does not shift another's output.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// RNG for the heuristic `name` under `seed`
pub fn stream_rng(seed: u64, name: &str) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream_id(name));
    rng
}

/// FNV-1a hash of the name; stable across platforms and releases
pub fn stream_id(name: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    name.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
