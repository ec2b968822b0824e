//! Forward protocols: replay each creation sequence from candidate seeds and keep
//! the first one whose attributes satisfy the criteria.
//!
//! Every candidate is simulated on locals. The entity is only written through
//! [`Derived::commit`] once a candidate passes all checks.

use tracing::{debug, trace};

use crate::attributes::{id32, is_shiny, pack_ivs, Gender, Nature};
use crate::constants::{
    FAKE_PID_CALLS, IVS_TO_PID_CALLS, MAX_SEEDS_IV, MAX_SEEDS_PID, STARTER_IV_OFFSET,
    STARTER_PID_OFFSET, STARTER_REPEAT_OFFSET,
};
use crate::criteria::Criteria;
use crate::entity::{Derived, Entity, PersonalInfo};
use crate::protocol::{
    is_male_eevee, next_colo_starter_pid, next_pid, next_pid_checked, pid_at, xd_starter,
    ColoStarter,
};
use crate::rng::{high16, next_k, prev_k, XdRng};
use crate::seeds::{recover_ivs, recover_origins};

/// Random-draw protocols only filter IVs when this few are requested.
pub const RANDOM_IV_FILTER_LIMIT: usize = 2;

fn passes_pid_checks<C: Criteria + ?Sized>(criteria: &C, pid: u32, gender_ratio: u8) -> bool {
    criteria.is_satisfied_nature(Nature::from_pid(pid))
        && criteria.is_satisfied_gender(Gender::from_pid(pid, gender_ratio))
}

fn passes_shiny<C: Criteria + ?Sized>(criteria: &C, id32: u32, pid: u32) -> bool {
    criteria.shiny().is_shiny() == is_shiny(id32, pid)
}

fn passes_iv_checks<C: Criteria + ?Sized>(criteria: &C, iv32: u32) -> bool {
    criteria.is_satisfied_hidden_power(iv32) && criteria.is_satisfied_ivs(iv32)
}

/// Wild or trainer encounter with all six IVs requested and the trainer IDs taken
/// from `entity`. With `no_shiny` the PID is rerolled until it is not shiny;
/// otherwise the shiny request is enforced.
pub fn set_from_ivs<E, C>(
    entity: &mut E,
    criteria: &C,
    personal: &PersonalInfo,
    no_shiny: bool,
) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    set_from_ivs_locked(entity, criteria, personal, no_shiny, |_| true)
}

/// [`set_from_ivs`] with an extra per-seed predicate, for encounters whose earlier
/// team members lock the PID (the predicate receives the seed preceding the IVs).
pub fn set_from_ivs_locked<E, C, L>(
    entity: &mut E,
    criteria: &C,
    personal: &PersonalInfo,
    no_shiny: bool,
    mut lock: L,
) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
    L: FnMut(u32) -> bool,
{
    let Some((iv1, iv2)) = criteria.combined_ivs() else {
        return false;
    };
    let id = entity.id32();
    let iv32 = pack_ivs(iv1, iv2);
    if !criteria.is_satisfied_hidden_power(iv32) {
        return false;
    }

    let mut seeds = [0u32; MAX_SEEDS_IV];
    let count = recover_ivs(&mut seeds, iv1, iv2);
    for &seed in &seeds[..count] {
        // seed => iv1, iv2, ability, {pid_hi, pid_lo}...
        let mut rng = XdRng::new(seed);
        rng.advance(2);
        let slot = (rng.next16() & 1) as u8;
        let pid = next_pid_checked(&mut rng, id, no_shiny);

        if !passes_pid_checks(criteria, pid, personal.gender) {
            trace!(seed, pid, "candidate rejected by nature/gender");
            continue;
        }
        if !no_shiny && !passes_shiny(criteria, id, pid) {
            continue;
        }
        if !lock(seed) {
            trace!(seed, "candidate rejected by lock");
            continue;
        }

        debug!(seed, pid, "regular encounter accepted");
        Derived {
            pid,
            iv1,
            iv2,
            ability_slot: slot,
            ability: personal.ability(slot),
            trainer: None,
        }
        .commit(entity);
        return true;
    }
    false
}

/// Colosseum starter for known trainer IDs. The second starter is only reached
/// after the first one's reroll loop has finished.
pub fn set_colo_starter_from_trainer_id<E, C>(
    entity: &mut E,
    criteria: &C,
    starter: ColoStarter,
    tid: u16,
    sid: u16,
) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let info = PersonalInfo::UMBREON;
    let id = id32(tid, sid);
    let mut seeds = [0u32; MAX_SEEDS_PID];
    let count = recover_origins(&mut seeds, tid, sid);
    for &origin in &seeds[..count] {
        // origin => tid, sid, fake pid x2, iv1, iv2, ability, [pid...]
        let mut rng = XdRng::new(next_k(origin, STARTER_PID_OFFSET));
        let mut ability_seed = rng.state();
        let mut pid = next_colo_starter_pid(&mut rng, id);

        if starter == ColoStarter::Espeon {
            rng.advance(STARTER_REPEAT_OFFSET);
            ability_seed = rng.state();
            pid = next_colo_starter_pid(&mut rng, id);
        }

        if !passes_pid_checks(criteria, pid, info.gender) || !passes_shiny(criteria, id, pid) {
            continue;
        }

        // Unroll from the ability call to the IVs.
        let mut back = XdRng::new(ability_seed);
        let iv2 = back.prev15();
        let iv1 = back.prev15();
        if !passes_iv_checks(criteria, pack_ivs(iv1, iv2)) {
            continue;
        }

        debug!(origin, pid, ?starter, "colosseum starter accepted");
        Derived {
            pid,
            iv1,
            iv2,
            ability_slot: 0,
            ability: info.ability(0),
            trainer: Some((tid, sid)),
        }
        .commit(entity);
        return true;
    }
    false
}

/// Umbreon from requested IVs. It is generated first, so the trainer IDs sit a
/// fixed number of calls before its IVs.
pub fn set_colo_starter_first_from_ivs<E, C>(entity: &mut E, criteria: &C) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let Some((iv1, iv2)) = criteria.combined_ivs() else {
        return false;
    };
    let info = PersonalInfo::UMBREON;
    let mut seeds = [0u32; MAX_SEEDS_IV];
    let count = recover_ivs(&mut seeds, iv1, iv2);
    for &seed in &seeds[..count] {
        let tid = high16(prev_k(seed, FAKE_PID_CALLS + 1));
        let sid = high16(prev_k(seed, FAKE_PID_CALLS));
        let id = id32(tid, sid);

        let mut rng = XdRng::new(next_k(seed, IVS_TO_PID_CALLS));
        let pid = next_colo_starter_pid(&mut rng, id);
        if !passes_pid_checks(criteria, pid, info.gender)
            || !passes_shiny(criteria, id, pid)
            || !criteria.is_satisfied_hidden_power(pack_ivs(iv1, iv2))
        {
            continue;
        }

        debug!(seed, tid, sid, pid, "umbreon accepted");
        Derived {
            pid,
            iv1,
            iv2,
            ability_slot: 0,
            ability: info.ability(0),
            trainer: Some((tid, sid)),
        }
        .commit(entity);
        return true;
    }
    false
}

/// Espeon's PID for a trainer-ID hypothesis. Only derives the value; the caller
/// decides whether it is acceptable.
fn second_starter_pid(iv_seed: u32, id32: u32) -> u32 {
    let mut rng = XdRng::new(next_k(iv_seed, IVS_TO_PID_CALLS));
    next_colo_starter_pid(&mut rng, id32)
}

/// Espeon from requested IVs.
///
/// Umbreon's accepted PID pair sits just before Espeon's fake PID calls. Umbreon
/// may have rerolled any number of earlier pairs, and each reroll count implies a
/// different origin and therefore different trainer IDs. Hypotheses are tried from
/// zero rerolls upward; an extra pair is only plausible while it is female (the
/// lock rejects it whatever the trainer IDs), so the walk ends at the first male one.
pub fn set_colo_starter_second_from_ivs<E, C>(entity: &mut E, criteria: &C) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let Some((iv1, iv2)) = criteria.combined_ivs() else {
        return false;
    };
    let info = PersonalInfo::ESPEON;
    if !criteria.is_satisfied_hidden_power(pack_ivs(iv1, iv2)) {
        return false;
    }

    let mut seeds = [0u32; MAX_SEEDS_IV];
    let count = recover_ivs(&mut seeds, iv1, iv2);
    for &seed in &seeds[..count] {
        // State before the k-th most recent Umbreon PID pair (k = 0 is the accepted one).
        let pair_seed = |rerolls: u32| prev_k(seed, FAKE_PID_CALLS + 2 + 2 * rerolls);

        let umbreon = pid_at(pair_seed(0));
        if !is_male_eevee(umbreon) {
            continue;
        }

        let mut rerolls = 0u32;
        loop {
            let origin = prev_k(pair_seed(rerolls), STARTER_PID_OFFSET);
            let mut rng = XdRng::new(origin);
            let tid = rng.next16();
            let sid = rng.next16();
            let id = id32(tid, sid);

            if !is_shiny(id, umbreon) {
                let pid = second_starter_pid(seed, id);
                if passes_pid_checks(criteria, pid, info.gender)
                    && passes_shiny(criteria, id, pid)
                {
                    debug!(origin, tid, sid, pid, rerolls, "espeon accepted");
                    Derived {
                        pid,
                        iv1,
                        iv2,
                        ability_slot: 0,
                        ability: info.ability(0),
                        trainer: Some((tid, sid)),
                    }
                    .commit(entity);
                    return true;
                }
            }

            if is_male_eevee(pid_at(pair_seed(rerolls + 1))) {
                break;
            }
            rerolls += 1;
        }
    }
    false
}

/// XD starter for known trainer IDs. Eevee's PID pair is never rerolled.
pub fn set_xd_starter_from_trainer_id<E, C>(
    entity: &mut E,
    criteria: &C,
    tid: u16,
    sid: u16,
) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let info = PersonalInfo::EEVEE;
    let id = id32(tid, sid);
    let mut seeds = [0u32; MAX_SEEDS_PID];
    let count = recover_origins(&mut seeds, tid, sid);
    for &origin in &seeds[..count] {
        let pid = pid_at(next_k(origin, STARTER_PID_OFFSET));
        if !passes_pid_checks(criteria, pid, info.gender) {
            continue;
        }

        let mut rng = XdRng::new(next_k(origin, STARTER_IV_OFFSET));
        let iv1 = rng.next15();
        let iv2 = rng.next15();
        if !passes_iv_checks(criteria, pack_ivs(iv1, iv2)) || !passes_shiny(criteria, id, pid) {
            continue;
        }

        debug!(origin, pid, "eevee accepted");
        Derived {
            pid,
            iv1,
            iv2,
            ability_slot: 0,
            ability: info.ability(0),
            trainer: Some((tid, sid)),
        }
        .commit(entity);
        return true;
    }
    false
}

/// XD starter from requested IVs; the trainer IDs are read back from the seed.
pub fn set_xd_starter_from_ivs<E, C>(entity: &mut E, criteria: &C) -> bool
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let Some((iv1, iv2)) = criteria.combined_ivs() else {
        return false;
    };
    let info = PersonalInfo::EEVEE;
    if !criteria.is_satisfied_hidden_power(pack_ivs(iv1, iv2)) {
        return false;
    }

    let mut seeds = [0u32; MAX_SEEDS_IV];
    let count = recover_ivs(&mut seeds, iv1, iv2);
    for &seed in &seeds[..count] {
        let pid = pid_at(next_k(seed, IVS_TO_PID_CALLS));
        if !passes_pid_checks(criteria, pid, info.gender) {
            continue;
        }

        let tid = high16(prev_k(seed, FAKE_PID_CALLS + 1));
        let sid = high16(prev_k(seed, FAKE_PID_CALLS));
        if !passes_shiny(criteria, id32(tid, sid), pid) {
            continue;
        }

        debug!(seed, tid, sid, pid, "eevee accepted");
        Derived {
            pid,
            iv1,
            iv2,
            ability_slot: 0,
            ability: info.ability(0),
            trainer: Some((tid, sid)),
        }
        .commit(entity);
        return true;
    }
    false
}

fn filters_random_ivs<C: Criteria + ?Sized>(criteria: &C) -> bool {
    (1..=RANDOM_IV_FILTER_LIMIT).contains(&criteria.specified_iv_count())
}

/// XD starter drawn from an arbitrary seed, trainer IDs included. Retries from
/// freshly advanced states until the criteria hold and returns the origin used.
///
/// There is no attempt cap; criteria that can never be met never return.
pub fn set_random_xd_starter<E, C>(entity: &mut E, criteria: &C, seed: u32) -> u32
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let info = PersonalInfo::EEVEE;
    let filter_ivs = filters_random_ivs(criteria);
    let mut origin = seed;
    loop {
        let trace = xd_starter(origin);
        let attempt = origin;
        // Next attempt starts after this one's last PID call.
        origin = next_k(trace.eevee.pid_seed, 2);

        let pid = trace.eevee.pid;
        let iv32 = pack_ivs(trace.eevee.iv1, trace.eevee.iv2);
        if !passes_pid_checks(criteria, pid, info.gender)
            || !passes_shiny(criteria, id32(trace.tid, trace.sid), pid)
            || !criteria.is_satisfied_hidden_power(iv32)
            || (filter_ivs && !criteria.is_satisfied_ivs(iv32))
        {
            continue;
        }

        debug!(origin = attempt, pid, "random eevee accepted");
        Derived {
            pid,
            iv1: trace.eevee.iv1,
            iv2: trace.eevee.iv2,
            ability_slot: 0,
            ability: info.ability(0),
            trainer: Some((trace.tid, trace.sid)),
        }
        .commit(entity);
        return attempt;
    }
}

/// Shiny handling differs between the two games' regular encounters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShinyRule {
    /// Colosseum regular encounters are never shiny.
    Forbidden,
    /// XD honours the requested shininess.
    Requested,
}

fn set_random_regular<E, C>(
    entity: &mut E,
    criteria: &C,
    personal: &PersonalInfo,
    seed: u32,
    rule: ShinyRule,
) -> u32
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    let id = entity.id32();
    let filter_ivs = filters_random_ivs(criteria);
    let mut start = seed;
    loop {
        // start => fake pid x2, iv1, iv2, ability, pid_hi, pid_lo
        let attempt = start;
        let mut rng = XdRng::new(attempt);
        rng.advance(FAKE_PID_CALLS);
        let iv1 = rng.next15();
        let iv2 = rng.next15();
        let slot = (rng.next16() & 1) as u8;
        let pid = next_pid(&mut rng);
        start = rng.state();

        if !passes_pid_checks(criteria, pid, personal.gender) {
            continue;
        }
        let shiny_ok = match rule {
            ShinyRule::Forbidden => !is_shiny(id, pid),
            ShinyRule::Requested => passes_shiny(criteria, id, pid),
        };
        if !shiny_ok {
            continue;
        }
        let iv32 = pack_ivs(iv1, iv2);
        if !criteria.is_satisfied_hidden_power(iv32)
            || (filter_ivs && !criteria.is_satisfied_ivs(iv32))
        {
            continue;
        }

        debug!(origin = attempt, pid, "random encounter accepted");
        Derived {
            pid,
            iv1,
            iv2,
            ability_slot: slot,
            ability: personal.ability(slot),
            trainer: None,
        }
        .commit(entity);
        return attempt;
    }
}

/// Colosseum regular encounter drawn from an arbitrary seed for the entity's
/// trainer. Never shiny. Returns the seed preceding the accepted attempt.
pub fn set_random_colo<E, C>(
    entity: &mut E,
    criteria: &C,
    personal: &PersonalInfo,
    seed: u32,
) -> u32
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    set_random_regular(entity, criteria, personal, seed, ShinyRule::Forbidden)
}

/// XD regular encounter drawn from an arbitrary seed for the entity's trainer.
pub fn set_random_xd<E, C>(
    entity: &mut E,
    criteria: &C,
    personal: &PersonalInfo,
    seed: u32,
) -> u32
where
    E: Entity + ?Sized,
    C: Criteria + ?Sized,
{
    set_random_regular(entity, criteria, personal, seed, ShinyRule::Requested)
}

#[cfg(test)]
mod tests;
