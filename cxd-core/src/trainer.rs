//! Trainer ID legality: TID/SID are drawn [`TRAINER_ID_ADVANCES`] calls after the
//! name screen closes.

use tracing::trace;

use crate::constants::{MAX_SEEDS_PID, TRAINER_ID_ADVANCES};
use crate::name_screen::{find_name_screen_origin, NameScreenOrigin};
use crate::rng::prev_k;
use crate::seeds::recover_origins;

/// Name-screen origin of the first seed that draws `tid` then `sid`.
pub fn trainer_id_origin(tid: u16, sid: u16) -> Option<NameScreenOrigin> {
    let mut seeds = [0u32; MAX_SEEDS_PID];
    let count = recover_origins(&mut seeds, tid, sid);
    seeds[..count].iter().find_map(|&seed| {
        let exit = prev_k(seed, TRAINER_ID_ADVANCES);
        let found = find_name_screen_origin(exit);
        if found.is_none() {
            trace!(seed, exit, "trainer seed unreachable");
        }
        found
    })
}

pub fn is_trainer_id_reachable(tid: u16, sid: u16) -> bool {
    trainer_id_origin(tid, sid).is_some()
}

/// Tries the eight SIDs `xor ^ n` that make a PID shiny for `tid`, where `xor` is
/// `tid ^ pid_hi ^ pid_lo` and `n` cycles from `bits`. Returns the first SID the
/// name screen can produce.
pub fn find_shiny_sid(tid: u16, xor: u16, bits: u32) -> Option<u16> {
    (0..8u32).find_map(|i| {
        let sid = xor ^ (bits.wrapping_add(i) & 7) as u16;
        is_trainer_id_reachable(tid, sid).then_some(sid)
    })
}
