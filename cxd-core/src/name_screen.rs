//! Reachability from the player-name confirmation screen.
//!
//! While the name screen is open every frame draws one value; a draw with
//! `value / 10 == 0` (high 16 bits at most [`NAME_SCREEN_SKIP_THRESHOLD`]) is a skip,
//! and the screen closes after [`NAME_SCREEN_ACCEPTS`] consecutive accepts. A skip
//! restarts the run, so one observed seed can sit behind several skip patterns.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{NAME_SCREEN_ACCEPTS, NAME_SCREEN_MAX_DEPTH, NAME_SCREEN_SKIP_THRESHOLD};
use crate::rng::{prev, XdRng};

/// Seed that confirmed the player name, and how many skip runs separate it from
/// the searched seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameScreenOrigin {
    pub origin: u32,
    pub depth: u8,
}

#[inline]
fn accepts(value: u16) -> bool {
    value > NAME_SCREEN_SKIP_THRESHOLD
}

/// Finds the name-screen seed that `seed` can be reached from, with the fewest
/// skip runs up to [`NAME_SCREEN_MAX_DEPTH`].
///
/// The reported origin is the state before the final run of
/// [`NAME_SCREEN_ACCEPTS`] accepting draws, never `seed` itself: at depth 0 it is
/// `prev_k(seed, NAME_SCREEN_ACCEPTS)`.
pub fn find_name_screen_origin(seed: u32) -> Option<NameScreenOrigin> {
    find_name_screen_origin_within(seed, NAME_SCREEN_MAX_DEPTH)
}

/// [`find_name_screen_origin`] with an explicit depth bound. Shallower depths are
/// exhausted first, so a reported depth is never larger than needed.
pub fn find_name_screen_origin_within(seed: u32, max_depth: u8) -> Option<NameScreenOrigin> {
    let found = (0..=max_depth).find_map(|limit| {
        search(seed, 0, limit).map(|origin| NameScreenOrigin {
            origin,
            depth: limit,
        })
    });
    if let Some(found) = found {
        debug!(seed, origin = found.origin, depth = found.depth, "name screen reachable");
    }
    found
}

fn search(seed: u32, depth: u8, limit: u8) -> Option<u32> {
    let mut rng = XdRng::new(seed);
    let mut accepted = [false; NAME_SCREEN_ACCEPTS];
    for slot in &mut accepted {
        *slot = accepts(rng.prev16());
    }
    if accepted.iter().all(|&a| a) {
        return Some(rng.state());
    }
    if depth >= limit {
        return None;
    }

    // A skip can precede the run after any prefix of accepted draws.
    for prefix in 0..NAME_SCREEN_ACCEPTS {
        let skipped = !accepts(rng.prev16());
        if skipped && accepted[..prefix].iter().all(|&a| a) {
            if let Some(origin) = search(prev(rng.state()), depth + 1, limit) {
                return Some(origin);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::next_k;

    #[test]
    fn four_accepts_are_reachable_without_skips() {
        let origin = 0xFAA2_7B12;
        let target = next_k(origin, NAME_SCREEN_ACCEPTS as u32);
        assert_eq!(target, 0x3E51_B176);
        assert_eq!(
            find_name_screen_origin(target),
            Some(NameScreenOrigin { origin, depth: 0 })
        );
    }

    #[test]
    fn reports_minimal_depth() {
        let cases = [
            (0x41A8_D6F9, 0xD0F4_251F, 1),
            (0x8F00_8803, 0x7700_4D06, 2),
            (0x067F_5B43, 0xAA9C_A64B, 3),
        ];
        for (seed, origin, depth) in cases {
            assert_eq!(
                find_name_screen_origin(seed),
                Some(NameScreenOrigin { origin, depth })
            );
            assert_eq!(find_name_screen_origin_within(seed, depth - 1), None);
        }
    }

    #[test]
    fn skip_draw_blocks_the_zero_depth_path() {
        // The draw right before the target reads 0.
        let seed = crate::rng::next(0x0000_1234);
        assert!(!accepts(0));
        assert_eq!(search(seed, 0, 0), None);
    }
}
