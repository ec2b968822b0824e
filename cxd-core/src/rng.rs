use crate::constants::{ADD, ADD_INV, MULT, MULT_INV};

/// Advances the state by one call.
#[inline]
pub const fn next(seed: u32) -> u32 {
    seed.wrapping_mul(MULT).wrapping_add(ADD)
}

/// Rewinds the state by one call.
#[inline]
pub const fn prev(seed: u32) -> u32 {
    seed.wrapping_mul(MULT_INV).wrapping_add(ADD_INV)
}

/// The 16 bits of a state that the game reads from each call.
#[inline]
pub const fn high16(seed: u32) -> u16 {
    (seed >> 16) as u16
}

/// Composes the affine step `(mult, add)` with itself `count` times by squaring.
const fn jump(mult: u32, add: u32, mut count: u32) -> (u32, u32) {
    let (mut acc_mult, mut acc_add) = (1u32, 0u32);
    let (mut base_mult, mut base_add) = (mult, add);
    while count != 0 {
        if count & 1 != 0 {
            acc_mult = acc_mult.wrapping_mul(base_mult);
            acc_add = acc_add.wrapping_mul(base_mult).wrapping_add(base_add);
        }
        base_add = base_add.wrapping_mul(base_mult).wrapping_add(base_add);
        base_mult = base_mult.wrapping_mul(base_mult);
        count >>= 1;
    }
    (acc_mult, acc_add)
}

/// Equivalent to `count` applications of [`next`].
#[inline]
pub const fn next_k(seed: u32, count: u32) -> u32 {
    let (mult, add) = jump(MULT, ADD, count);
    seed.wrapping_mul(mult).wrapping_add(add)
}

/// Equivalent to `count` applications of [`prev`].
#[inline]
pub const fn prev_k(seed: u32, count: u32) -> u32 {
    let (mult, add) = jump(MULT_INV, ADD_INV, count);
    seed.wrapping_mul(mult).wrapping_add(add)
}

/// Stateful cursor over the generator, mirroring how the game consumes calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XdRng {
    state: u32,
}

impl XdRng {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub const fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = next(self.state);
        self.state
    }

    /// Steps forward and returns the value the game reads.
    pub fn next16(&mut self) -> u16 {
        high16(self.next_u32())
    }

    /// Steps forward and returns a 15-bit IV block.
    pub fn next15(&mut self) -> u16 {
        self.next16() & crate::constants::IV_MASK
    }

    pub fn prev_u32(&mut self) -> u32 {
        self.state = prev(self.state);
        self.state
    }

    /// Steps backward and returns the high bits of the state landed on.
    pub fn prev16(&mut self) -> u16 {
        high16(self.prev_u32())
    }

    pub fn prev15(&mut self) -> u16 {
        self.prev16() & crate::constants::IV_MASK
    }

    pub fn advance(&mut self, count: u32) {
        self.state = next_k(self.state, count);
    }

    pub fn rewind(&mut self, count: u32) {
        self.state = prev_k(self.state, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SEEDS: [u32; 6] = [
        0,
        1,
        0x1234_5678,
        0xDEAD_BEEF,
        0x8000_0000,
        0xFFFF_FFFF,
    ];

    #[test]
    fn forward_sequence_matches_known_values() {
        assert_eq!(next(0), 0x0026_9EC3);
        assert_eq!(next(next(0)), 0x1E27_8E7A);
        assert_eq!(next_k(0x1234_5678, 1000), 0x2B6D_9320);
    }

    #[test]
    fn backward_sequence_matches_known_values() {
        assert_eq!(prev(0), 0xA170_F641);
        assert_eq!(prev_k(0x1234_5678, 1000), 0x4522_C6D0);
    }

    #[test]
    fn inverse_constants_undo_a_step() {
        for seed in SAMPLE_SEEDS {
            assert_eq!(prev(next(seed)), seed);
            assert_eq!(next(prev(seed)), seed);
        }
    }

    #[test]
    fn jumps_are_exact_inverses() {
        let counts = [0u32, 1, 2, 7, 1000, 65_535, 0x8000_0001, u32::MAX];
        for seed in SAMPLE_SEEDS {
            for count in counts {
                assert_eq!(prev_k(next_k(seed, count), count), seed, "k={count}");
                assert_eq!(next_k(prev_k(seed, count), count), seed, "k={count}");
            }
        }
    }

    #[test]
    fn single_step_jump_matches_step() {
        for seed in SAMPLE_SEEDS {
            assert_eq!(next_k(seed, 1), next(seed));
            assert_eq!(prev_k(seed, 1), prev(seed));
            assert_eq!(next_k(seed, 0), seed);
        }
    }

    #[test]
    fn jump_matches_repeated_steps() {
        let mut seed = 0xC0FF_EE11u32;
        let start = seed;
        for count in 1..=300u32 {
            seed = next(seed);
            assert_eq!(next_k(start, count), seed);
        }
    }

    #[test]
    fn cursor_reads_high_bits() {
        let mut rng = XdRng::new(0);
        assert_eq!(rng.next16(), 0x0026);
        assert_eq!(rng.next16(), 0x1E27);
        assert_eq!(rng.prev16(), 0x0026);
        assert_eq!(rng.state(), 0x0026_9EC3);
    }

    #[test]
    fn cursor_masks_iv_blocks() {
        let mut rng = XdRng::new(0x1234_5678);
        let expected = high16(next(0x1234_5678)) & 0x7FFF;
        assert_eq!(rng.next15(), expected);
        assert!(rng.prev15() <= 0x7FFF);
        assert_eq!(rng.state(), 0x1234_5678);
    }

    #[test]
    fn advance_and_rewind_round_trip() {
        let mut rng = XdRng::new(0xDEAD_BEEF);
        rng.advance(1000);
        assert_eq!(rng.state(), next_k(0xDEAD_BEEF, 1000));
        rng.rewind(1000);
        assert_eq!(rng.state(), 0xDEAD_BEEF);
    }
}
