//! Backward reconstruction: recover the origin seed of a fully observed starter.
//!
//! Candidates come from the trainer IDs; each is replayed with the same layout the
//! forward protocols use and compared value by value against the observation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::attributes::id32;
use crate::constants::{
    FAKE_PID_CALLS, IVS_TO_PID_CALLS, MAX_SEEDS_PID, STARTER_IV_OFFSET, STARTER_PID_OFFSET,
};
use crate::entity::{Entity, Pokemon};
use crate::protocol::{next_colo_starter_pid, pid_at, ColoStarter, StarterKind};
use crate::rng::{next_k, XdRng};
use crate::seeds::recover_origins;

/// Final attributes of a generated starter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedStarter {
    pub iv1: u16,
    pub iv2: u16,
    pub pid: u32,
    pub tid: u16,
    pub sid: u16,
}

impl ObservedStarter {
    pub fn from_iv32(iv32: u32, pid: u32, tid: u16, sid: u16) -> Self {
        Self {
            iv1: (iv32 & 0x7FFF) as u16,
            iv2: (iv32 >> 15 & 0x7FFF) as u16,
            pid,
            tid,
            sid,
        }
    }

    /// Observation read through the entity accessors; the PID is the stored
    /// encryption constant.
    pub fn from_entity<E: Entity + ?Sized>(entity: &E) -> Self {
        let id = entity.id32();
        Self::from_iv32(
            entity.iv32(),
            entity.encryption_constant(),
            id as u16,
            (id >> 16) as u16,
        )
    }

    pub fn from_pokemon(pk: &Pokemon) -> Self {
        Self::from_entity(pk)
    }
}

/// True when the two calls after `seed` read the observed IV blocks.
fn matches_ivs(observed: &ObservedStarter, seed: u32) -> bool {
    let mut rng = XdRng::new(seed);
    rng.next15() == observed.iv1 && rng.next15() == observed.iv2
}

/// Origin seed (the state before the TID draw) of an observed starter.
pub fn origin_seed(kind: StarterKind, observed: &ObservedStarter) -> Option<u32> {
    match kind.colo() {
        Some(starter) => origin_seed_colo(starter, observed),
        None => origin_seed_xd(observed),
    }
}

/// [`origin_seed`] for a generated entity.
pub fn origin_seed_of_entity<E: Entity + ?Sized>(kind: StarterKind, entity: &E) -> Option<u32> {
    origin_seed(kind, &ObservedStarter::from_entity(entity))
}

/// Colosseum pair. Espeon's block only starts once Umbreon's reroll loop is paid
/// for, which the trainer IDs alone determine.
pub fn origin_seed_colo(starter: ColoStarter, observed: &ObservedStarter) -> Option<u32> {
    let id = id32(observed.tid, observed.sid);
    let mut seeds = [0u32; MAX_SEEDS_PID];
    let count = recover_origins(&mut seeds, observed.tid, observed.sid);
    for &origin in &seeds[..count] {
        if starter == ColoStarter::Umbreon
            && !matches_ivs(observed, next_k(origin, STARTER_IV_OFFSET))
        {
            trace!(origin, "umbreon ivs differ");
            continue;
        }

        let mut rng = XdRng::new(next_k(origin, STARTER_PID_OFFSET));
        let mut pid = next_colo_starter_pid(&mut rng, id);

        if starter == ColoStarter::Espeon {
            rng.advance(FAKE_PID_CALLS);
            if !matches_ivs(observed, rng.state()) {
                trace!(origin, "espeon ivs differ");
                continue;
            }
            rng.advance(IVS_TO_PID_CALLS);
            pid = next_colo_starter_pid(&mut rng, id);
        }

        if pid == observed.pid {
            debug!(origin, ?starter, "origin recovered");
            return Some(origin);
        }
    }
    None
}

/// XD Eevee; its PID pair is read once without rerolls.
pub fn origin_seed_xd(observed: &ObservedStarter) -> Option<u32> {
    let mut seeds = [0u32; MAX_SEEDS_PID];
    let count = recover_origins(&mut seeds, observed.tid, observed.sid);
    seeds[..count].iter().copied().find(|&origin| {
        matches_ivs(observed, next_k(origin, STARTER_IV_OFFSET))
            && pid_at(next_k(origin, STARTER_PID_OFFSET)) == observed.pid
    })
}
