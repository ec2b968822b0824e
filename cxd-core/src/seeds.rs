//! Recovery of full 32-bit states from the 16 (or 15) bits the game exposes per call.
//!
//! The multiplier is larger than the 16 unknown low bits can move the next output,
//! so fixing the high bits of one state and scanning its low half finds every state
//! whose successor matches a second observation.

use crate::constants::{IV_MASK, MAX_SEEDS_IV, MAX_SEEDS_PID, MAX_SEEDS_SINGLE};
use crate::rng::{high16, next, prev};

/// Writes every state `s` with `high16(s) == first` (and `high16(next(s)) == second`
/// when given) into `result`, returning the count written.
///
/// `result` must hold [`MAX_SEEDS_PID`] entries for a chained search and
/// [`MAX_SEEDS_SINGLE`] for an unchained one.
pub fn recover(result: &mut [u32], first: u16, second: Option<u16>) -> usize {
    let capacity = if second.is_some() {
        MAX_SEEDS_PID
    } else {
        MAX_SEEDS_SINGLE
    };
    assert!(
        result.len() >= capacity,
        "seed buffer too small: {} < {capacity}",
        result.len()
    );

    let base = (first as u32) << 16;
    let mut count = 0;
    for low in 0..=u16::MAX as u32 {
        let seed = base | low;
        if let Some(second) = second {
            if high16(next(seed)) != second {
                continue;
            }
        }
        result[count] = seed;
        count += 1;
    }
    count
}

/// Writes every seed immediately preceding two consecutive calls that read `first`
/// then `second`. This is the origin shape the starter protocols need for TID/SID.
pub fn recover_origins(result: &mut [u32], first: u16, second: u16) -> usize {
    let count = recover(result, first, Some(second));
    for seed in &mut result[..count] {
        *seed = prev(*seed);
    }
    count
}

/// Writes every seed whose next two calls, masked to 15 bits, read `iv1` then `iv2`.
///
/// `result` must hold [`MAX_SEEDS_IV`] entries.
pub fn recover_ivs(result: &mut [u32], iv1: u16, iv2: u16) -> usize {
    assert!(
        result.len() >= MAX_SEEDS_IV,
        "seed buffer too small: {} < {MAX_SEEDS_IV}",
        result.len()
    );
    debug_assert!(iv1 <= IV_MASK && iv2 <= IV_MASK);

    let mut count = 0;
    for top in [0u32, 0x8000] {
        let base = ((iv1 as u32 & IV_MASK as u32) | top) << 16;
        for low in 0..=u16::MAX as u32 {
            let seed = base | low;
            if high16(next(seed)) & IV_MASK != iv2 & IV_MASK {
                continue;
            }
            result[count] = prev(seed);
            count += 1;
        }
    }
    count
}
