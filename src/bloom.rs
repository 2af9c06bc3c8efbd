//! Membership Filters
//!
//! Wire-format Bloom filters as carried inside an Exclude element. The wire
//! payload is an 8-byte header (lg_bits, n_hash, method, reserved, 4-byte
//! seed) followed by `2^lg_bits / 8` filter bytes.

use crate::error::CodingError;

const HEADER_LEN: usize = 8;
const METHOD: u8 = b'A';

/// Smallest filter whose bits are all set: excludes everything in its range.
pub const SATURATED_FILTER: [u8; 9] = [3, 1, METHOD, 0, 0, 0, 0, 0, 0xFF];

/// A validated wire-format membership filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BloomFilter {
    wire: Vec<u8>,
}

impl BloomFilter {
    /// Validate a wire payload.
    pub fn validate(wire: &[u8]) -> Result<Self, CodingError> {
        if wire.len() < HEADER_LEN + 1 {
            return Err(CodingError::InvalidFilter(format!(
                "payload of {} bytes is too short",
                wire.len()
            )));
        }
        let lg_bits = wire[0];
        let n_hash = wire[1];
        if !(3..=13).contains(&lg_bits) {
            return Err(CodingError::InvalidFilter(format!(
                "lg_bits {} out of range",
                lg_bits
            )));
        }
        if !(1..=32).contains(&n_hash) {
            return Err(CodingError::InvalidFilter(format!(
                "n_hash {} out of range",
                n_hash
            )));
        }
        if wire[2] != METHOD || wire[3] != 0 {
            return Err(CodingError::InvalidFilter(
                "unknown method or nonzero reserved byte".to_string(),
            ));
        }
        let expected = HEADER_LEN + (1usize << lg_bits) / 8;
        if wire.len() != expected {
            return Err(CodingError::InvalidFilter(format!(
                "expected {} bytes for lg_bits {}, got {}",
                expected,
                lg_bits,
                wire.len()
            )));
        }
        Ok(Self {
            wire: wire.to_vec(),
        })
    }

    /// The filter matching every key.
    pub fn saturated() -> Self {
        Self {
            wire: SATURATED_FILTER.to_vec(),
        }
    }

    /// An empty filter with `2^lg_bits` bits, ready for `insert`.
    pub fn with_capacity(lg_bits: u8, n_hash: u8, seed: [u8; 4]) -> Result<Self, CodingError> {
        let lg_bits = lg_bits.clamp(3, 13);
        let mut wire = vec![lg_bits, n_hash, METHOD, 0];
        wire.extend_from_slice(&seed);
        wire.resize(HEADER_LEN + (1usize << lg_bits) / 8, 0);
        Self::validate(&wire)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.wire
    }

    fn bits(&self) -> &[u8] {
        &self.wire[HEADER_LEN..]
    }

    pub fn is_saturated(&self) -> bool {
        self.bits().iter().all(|b| *b == 0xFF)
    }

    fn bit_positions(&self, key: &[u8]) -> Vec<usize> {
        let mask = (1usize << self.wire[0]) - 1;
        let mut state = u32::from_be_bytes([self.wire[4], self.wire[5], self.wire[6], self.wire[7]])
            & 0x7FFF_FFFF;
        for byte in key {
            state = next_hash(state, u32::from(*byte) + 1);
        }
        (0..self.wire[1])
            .map(|_| {
                state = next_hash(state, 0);
                state as usize & mask
            })
            .collect()
    }

    pub fn insert(&mut self, key: &[u8]) {
        for bit in self.bit_positions(key) {
            self.wire[HEADER_LEN + bit / 8] |= 1 << (bit % 8);
        }
    }

    /// Whether `key` may be a member. Saturated filters match every key.
    pub fn matches(&self, key: &[u8]) -> bool {
        if self.is_saturated() {
            return true;
        }
        let bits = self.bits();
        self.bit_positions(key)
            .into_iter()
            .all(|bit| bits[bit / 8] & (1 << (bit % 8)) != 0)
    }
}

/// 31-bit feedback shift step (x^31 + x^13 + 1) mixed with `input`.
fn next_hash(state: u32, input: u32) -> u32 {
    const K: u32 = 13;
    let low = state & ((1 << K) - 1);
    let shifted = (state >> K) ^ (low << (31 - K)) ^ (low << (31 - 2 * K));
    (shifted.wrapping_add(input)) & 0x7FFF_FFFF
}
