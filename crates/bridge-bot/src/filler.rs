//! Deterministic filler features for genome slots beyond the named ones.

use bridge_core::model::card::Card;

/// SplitMix64 finaliser.
pub const fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Value in `[0, 1)` in steps of 0.01, fixed for a given card, slot and
/// number of completed tricks.
pub fn filler(card: Card, slot: usize, tricks_played: u8) -> f64 {
    let key = ((card.index() as u64) << 32) | ((slot as u64) << 8) | u64::from(tricks_played);
    (splitmix64(key) % 100) as f64 / 100.0
}
