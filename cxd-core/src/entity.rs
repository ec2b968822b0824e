use serde::{Deserialize, Serialize};

use crate::attributes::{id32, is_shiny, pack_ivs, unpack_ivs, Gender, HiddenPowerType, Nature};
use crate::constants::{
    ABILITY_RUN_AWAY, ABILITY_SYNCHRONIZE, GENDER_RATIO_MALE_87_5, SPECIES_EEVEE, SPECIES_ESPEON,
    SPECIES_UMBREON,
};

/// Destination for generated attributes. Protocols only write to it after a
/// candidate has passed every check.
pub trait Entity {
    /// Packed `sid << 16 | tid`.
    fn id32(&self) -> u32;
    /// PID as stored on the record, which may differ from the `pid` field of
    /// formats that keep both.
    fn encryption_constant(&self) -> u32;
    /// Packed IVs, `hp | atk << 5 | def << 10 | spe << 15 | spa << 20 | spd << 25`.
    fn iv32(&self) -> u32;
    fn set_pid(&mut self, pid: u32);
    fn set_ivs(&mut self, iv32: u32);
    fn set_ability(&mut self, slot: u8, ability: u16);
    fn set_trainer_ids(&mut self, tid: u16, sid: u16);
}

/// Per-species data the protocols consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub gender: u8,
    pub abilities: [u16; 2],
}

impl PersonalInfo {
    pub const EEVEE: Self = Self {
        gender: GENDER_RATIO_MALE_87_5,
        abilities: [ABILITY_RUN_AWAY, 0],
    };
    pub const ESPEON: Self = Self {
        gender: GENDER_RATIO_MALE_87_5,
        abilities: [ABILITY_SYNCHRONIZE, 0],
    };
    pub const UMBREON: Self = Self {
        gender: GENDER_RATIO_MALE_87_5,
        abilities: [ABILITY_SYNCHRONIZE, 0],
    };

    pub fn for_species(species: u16) -> Option<Self> {
        match species {
            SPECIES_EEVEE => Some(Self::EEVEE),
            SPECIES_ESPEON => Some(Self::ESPEON),
            SPECIES_UMBREON => Some(Self::UMBREON),
            _ => None,
        }
    }

    /// Ability for a slot bit; species with one ability ignore the bit.
    pub fn ability(&self, slot: u8) -> u16 {
        match self.abilities[(slot & 1) as usize] {
            0 => self.abilities[0],
            ability => ability,
        }
    }
}

/// Attributes derived by a protocol, held locally until the candidate is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Derived {
    pub pid: u32,
    pub iv1: u16,
    pub iv2: u16,
    pub ability_slot: u8,
    pub ability: u16,
    pub trainer: Option<(u16, u16)>,
}

impl Derived {
    pub fn commit<E: Entity + ?Sized>(self, entity: &mut E) {
        if let Some((tid, sid)) = self.trainer {
            entity.set_trainer_ids(tid, sid);
        }
        entity.set_pid(self.pid);
        entity.set_ivs(pack_ivs(self.iv1, self.iv2));
        entity.set_ability(self.ability_slot, self.ability);
    }
}

/// Minimal Gen 3 entity record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub species: u16,
    pub pid: u32,
    pub tid: u16,
    pub sid: u16,
    pub iv32: u32,
    pub ability_slot: u8,
    pub ability: u16,
}

impl Pokemon {
    pub fn new(species: u16) -> Self {
        Self {
            species,
            ..Self::default()
        }
    }

    pub fn with_trainer(species: u16, tid: u16, sid: u16) -> Self {
        Self {
            species,
            tid,
            sid,
            ..Self::default()
        }
    }

    pub fn nature(&self) -> Nature {
        Nature::from_pid(self.pid)
    }

    pub fn gender(&self, ratio: u8) -> Gender {
        Gender::from_pid(self.pid, ratio)
    }

    pub fn is_shiny(&self) -> bool {
        is_shiny(self.id32(), self.pid)
    }

    pub fn hidden_power(&self) -> HiddenPowerType {
        HiddenPowerType::from_iv32(self.iv32)
    }

    /// `[hp, atk, def, spe, spa, spd]`
    pub fn ivs(&self) -> [u32; 6] {
        unpack_ivs(self.iv32)
    }

    pub fn iv_blocks(&self) -> (u16, u16) {
        ((self.iv32 & 0x7FFF) as u16, (self.iv32 >> 15 & 0x7FFF) as u16)
    }
}

impl Entity for Pokemon {
    fn id32(&self) -> u32 {
        id32(self.tid, self.sid)
    }

    fn encryption_constant(&self) -> u32 {
        self.pid
    }

    fn iv32(&self) -> u32 {
        self.iv32
    }

    fn set_pid(&mut self, pid: u32) {
        self.pid = pid;
    }

    fn set_ivs(&mut self, iv32: u32) {
        self.iv32 = iv32;
    }

    fn set_ability(&mut self, slot: u8, ability: u16) {
        self.ability_slot = slot;
        self.ability = ability;
    }

    fn set_trainer_ids(&mut self, tid: u16, sid: u16) {
        self.tid = tid;
        self.sid = sid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_ability_species_ignore_slot() {
        assert_eq!(PersonalInfo::EEVEE.ability(1), ABILITY_RUN_AWAY);
        let dual = PersonalInfo {
            gender: 0x7F,
            abilities: [10, 20],
        };
        assert_eq!(dual.ability(0), 10);
        assert_eq!(dual.ability(1), 20);
    }

    #[test]
    fn commit_writes_every_field() {
        let mut pk = Pokemon::new(SPECIES_UMBREON);
        Derived {
            pid: 0xC704_7D49,
            iv1: 23446,
            iv2: 14229,
            ability_slot: 0,
            ability: ABILITY_SYNCHRONIZE,
            trainer: Some((46057, 23359)),
        }
        .commit(&mut pk);

        assert_eq!(pk.pid, 0xC704_7D49);
        assert_eq!((pk.tid, pk.sid), (46057, 23359));
        assert_eq!(pk.iv_blocks(), (23446, 14229));
        assert_eq!(pk.ability, ABILITY_SYNCHRONIZE);
        assert_eq!(pk.encryption_constant(), pk.pid);
        assert_eq!(Entity::iv32(&pk), pk.iv32);
    }
}
