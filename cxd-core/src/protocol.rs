//! Call layouts shared by the forward and backward procedures.
//!
//! Starter layout from the seed preceding the TID draw:
//! `tid, sid, fake_pid_hi, fake_pid_lo, iv1, iv2, ability, {pid_hi, pid_lo}...`
//! Colosseum rerolls the PID pair until the starter is male and not shiny, then
//! repeats the block (minus the trainer IDs) for the second starter.

use serde::{Deserialize, Serialize};

use crate::attributes::{id32, is_shiny};
use crate::constants::{
    FAKE_PID_CALLS, GENDER_RATIO_MALE_87_5, SPECIES_EEVEE, SPECIES_ESPEON, SPECIES_UMBREON,
    STARTER_IV_OFFSET, STARTER_PID_OFFSET, STARTER_REPEAT_OFFSET,
};
use crate::rng::{high16, next, XdRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColoStarter {
    Umbreon,
    Espeon,
}

impl ColoStarter {
    pub fn species(self) -> u16 {
        match self {
            Self::Umbreon => SPECIES_UMBREON,
            Self::Espeon => SPECIES_ESPEON,
        }
    }
}

/// The closed set of starter protocols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarterKind {
    Umbreon,
    Espeon,
    Eevee,
}

impl StarterKind {
    pub fn from_species(species: u16) -> Option<Self> {
        match species {
            SPECIES_UMBREON => Some(Self::Umbreon),
            SPECIES_ESPEON => Some(Self::Espeon),
            SPECIES_EEVEE => Some(Self::Eevee),
            _ => None,
        }
    }

    pub fn species(self) -> u16 {
        match self {
            Self::Umbreon => SPECIES_UMBREON,
            Self::Espeon => SPECIES_ESPEON,
            Self::Eevee => SPECIES_EEVEE,
        }
    }

    pub fn colo(self) -> Option<ColoStarter> {
        match self {
            Self::Umbreon => Some(ColoStarter::Umbreon),
            Self::Espeon => Some(ColoStarter::Espeon),
            Self::Eevee => None,
        }
    }
}

#[inline]
pub(crate) fn pid_from_halves(hi: u16, lo: u16) -> u32 {
    (hi as u32) << 16 | lo as u32
}

/// PID read by the two calls following `seed`, without advancing a cursor.
#[inline]
pub(crate) fn pid_at(seed: u32) -> u32 {
    let hi = next(seed);
    pid_from_halves(high16(hi), high16(next(hi)))
}

#[inline]
pub(crate) fn next_pid(rng: &mut XdRng) -> u32 {
    let hi = rng.next16();
    let lo = rng.next16();
    pid_from_halves(hi, lo)
}

#[inline]
pub(crate) fn is_male_eevee(pid: u32) -> bool {
    (pid & 0xFF) >= GENDER_RATIO_MALE_87_5 as u32
}

#[inline]
pub(crate) fn is_valid_colo_starter(id32: u32, pid: u32) -> bool {
    is_male_eevee(pid) && !is_shiny(id32, pid)
}

/// Draws PID pairs until the Colosseum starter lock accepts one. Every rejected
/// pair is paid for before the caller sees the cursor again.
pub(crate) fn next_colo_starter_pid(rng: &mut XdRng, id32: u32) -> u32 {
    loop {
        let pid = next_pid(rng);
        if is_valid_colo_starter(id32, pid) {
            return pid;
        }
    }
}

/// Draws PID pairs, rerolling shiny ones when `no_shiny` is set.
pub(crate) fn next_pid_checked(rng: &mut XdRng, id32: u32, no_shiny: bool) -> u32 {
    loop {
        let pid = next_pid(rng);
        if !no_shiny || !is_shiny(id32, pid) {
            return pid;
        }
    }
}

/// One generated starter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterTrace {
    pub pid: u32,
    pub iv1: u16,
    pub iv2: u16,
    /// State after the ability call, where the PID draws begin.
    pub pid_seed: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoStarters {
    pub origin: u32,
    pub tid: u16,
    pub sid: u16,
    pub umbreon: StarterTrace,
    pub espeon: StarterTrace,
}

impl ColoStarters {
    pub fn get(&self, starter: ColoStarter) -> &StarterTrace {
        match starter {
            ColoStarter::Umbreon => &self.umbreon,
            ColoStarter::Espeon => &self.espeon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XdStarter {
    pub origin: u32,
    pub tid: u16,
    pub sid: u16,
    pub eevee: StarterTrace,
}

fn next_starter_block(rng: &mut XdRng) -> (u16, u16) {
    rng.advance(FAKE_PID_CALLS);
    let iv1 = rng.next15();
    let iv2 = rng.next15();
    rng.next_u32();
    (iv1, iv2)
}

/// Replays the Colosseum starter sequence from the seed preceding the TID draw.
pub fn colo_starters(origin: u32) -> ColoStarters {
    let mut rng = XdRng::new(origin);
    let tid = rng.next16();
    let sid = rng.next16();
    let id = id32(tid, sid);

    let mut starter = || {
        let (iv1, iv2) = next_starter_block(&mut rng);
        let pid_seed = rng.state();
        let pid = next_colo_starter_pid(&mut rng, id);
        StarterTrace {
            pid,
            iv1,
            iv2,
            pid_seed,
        }
    };
    let umbreon = starter();
    let espeon = starter();

    ColoStarters {
        origin,
        tid,
        sid,
        umbreon,
        espeon,
    }
}

/// Replays the XD starter sequence from the seed preceding the TID draw.
pub fn xd_starter(origin: u32) -> XdStarter {
    let mut rng = XdRng::new(origin);
    let tid = rng.next16();
    let sid = rng.next16();
    let (iv1, iv2) = next_starter_block(&mut rng);
    let pid_seed = rng.state();
    let pid = next_pid(&mut rng);

    XdStarter {
        origin,
        tid,
        sid,
        eevee: StarterTrace {
            pid,
            iv1,
            iv2,
            pid_seed,
        },
    }
}

// Compile-time agreement between the named offsets and the layout above.
const _: () = assert!(STARTER_IV_OFFSET == 2 + FAKE_PID_CALLS);
const _: () = assert!(STARTER_PID_OFFSET == STARTER_IV_OFFSET + 3);
const _: () = assert!(STARTER_REPEAT_OFFSET == FAKE_PID_CALLS + 3);
