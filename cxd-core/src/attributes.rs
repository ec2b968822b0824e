use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    GENDER_RATIO_FEMALE_ONLY, GENDER_RATIO_GENDERLESS, GENDER_RATIO_MALE_ONLY, NATURE_COUNT,
    SHINY_THRESHOLD,
};
use crate::error::CriteriaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub const ALL: [Nature; NATURE_COUNT as usize] = [
        Self::Hardy,
        Self::Lonely,
        Self::Brave,
        Self::Adamant,
        Self::Naughty,
        Self::Bold,
        Self::Docile,
        Self::Relaxed,
        Self::Impish,
        Self::Lax,
        Self::Timid,
        Self::Hasty,
        Self::Serious,
        Self::Jolly,
        Self::Naive,
        Self::Modest,
        Self::Mild,
        Self::Quiet,
        Self::Bashful,
        Self::Rash,
        Self::Calm,
        Self::Gentle,
        Self::Sassy,
        Self::Careful,
        Self::Quirky,
    ];

    /// Temperament encoded by a PID.
    pub fn from_pid(pid: u32) -> Self {
        Self::ALL[(pid % NATURE_COUNT) as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hardy => "hardy",
            Self::Lonely => "lonely",
            Self::Brave => "brave",
            Self::Adamant => "adamant",
            Self::Naughty => "naughty",
            Self::Bold => "bold",
            Self::Docile => "docile",
            Self::Relaxed => "relaxed",
            Self::Impish => "impish",
            Self::Lax => "lax",
            Self::Timid => "timid",
            Self::Hasty => "hasty",
            Self::Serious => "serious",
            Self::Jolly => "jolly",
            Self::Naive => "naive",
            Self::Modest => "modest",
            Self::Mild => "mild",
            Self::Quiet => "quiet",
            Self::Bashful => "bashful",
            Self::Rash => "rash",
            Self::Calm => "calm",
            Self::Gentle => "gentle",
            Self::Sassy => "sassy",
            Self::Careful => "careful",
            Self::Quirky => "quirky",
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Nature {
    type Err = CriteriaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|nature| nature.as_str().eq_ignore_ascii_case(value))
            .ok_or(CriteriaError::UnknownNature)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

impl Gender {
    /// Gender of a PID for a species with the given ratio byte.
    pub fn from_pid(pid: u32, ratio: u8) -> Self {
        match ratio {
            GENDER_RATIO_GENDERLESS => Self::Genderless,
            GENDER_RATIO_FEMALE_ONLY => Self::Female,
            GENDER_RATIO_MALE_ONLY => Self::Male,
            _ if (pid & 0xFF) < ratio as u32 => Self::Female,
            _ => Self::Male,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Genderless => write!(f, "genderless"),
        }
    }
}

/// Requested shininess. `Random` behaves like `Never`: the protocols only produce a
/// shiny result when one is asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shiny {
    #[default]
    Random,
    Never,
    Always,
}

impl Shiny {
    pub fn is_shiny(self) -> bool {
        matches!(self, Self::Always)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenPowerType {
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
}

impl HiddenPowerType {
    pub const ALL: [HiddenPowerType; 16] = [
        Self::Fighting,
        Self::Flying,
        Self::Poison,
        Self::Ground,
        Self::Rock,
        Self::Bug,
        Self::Ghost,
        Self::Steel,
        Self::Fire,
        Self::Water,
        Self::Grass,
        Self::Electric,
        Self::Psychic,
        Self::Ice,
        Self::Dragon,
        Self::Dark,
    ];

    /// Type derived from the low bit of each IV in a packed IV word.
    pub fn from_iv32(iv32: u32) -> Self {
        let [hp, atk, def, spe, spa, spd] = unpack_ivs(iv32);
        let bits = (hp & 1)
            | (atk & 1) << 1
            | (def & 1) << 2
            | (spe & 1) << 3
            | (spa & 1) << 4
            | (spd & 1) << 5;
        Self::ALL[bits as usize * 15 / 63]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fighting => "fighting",
            Self::Flying => "flying",
            Self::Poison => "poison",
            Self::Ground => "ground",
            Self::Rock => "rock",
            Self::Bug => "bug",
            Self::Ghost => "ghost",
            Self::Steel => "steel",
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Grass => "grass",
            Self::Electric => "electric",
            Self::Psychic => "psychic",
            Self::Ice => "ice",
            Self::Dragon => "dragon",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for HiddenPowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for HiddenPowerType {
    type Err = CriteriaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
            .ok_or(CriteriaError::UnknownHiddenPowerType)
    }
}

/// Shiny check against a packed `sid << 16 | tid` trainer identity.
#[inline]
pub fn is_shiny(id32: u32, pid: u32) -> bool {
    let xor = id32 ^ pid;
    ((xor >> 16) ^ (xor & 0xFFFF)) < SHINY_THRESHOLD
}

#[inline]
pub fn id32(tid: u16, sid: u16) -> u32 {
    (sid as u32) << 16 | tid as u32
}

#[inline]
pub fn pack_ivs(iv1: u16, iv2: u16) -> u32 {
    (iv2 as u32) << 15 | iv1 as u32
}

/// Splits a packed IV word into `[hp, atk, def, spe, spa, spd]`.
pub fn unpack_ivs(iv32: u32) -> [u32; 6] {
    core::array::from_fn(|index| (iv32 >> (5 * index)) & 0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nature_comes_from_pid_modulo() {
        assert_eq!(Nature::from_pid(0), Nature::Hardy);
        assert_eq!(Nature::from_pid(3), Nature::Adamant);
        assert_eq!(Nature::from_pid(25 * 1000 + 24), Nature::Quirky);
        assert_eq!("Modest".parse::<Nature>(), Ok(Nature::Modest));
        assert_eq!("nope".parse::<Nature>(), Err(CriteriaError::UnknownNature));
    }

    #[test]
    fn gender_uses_low_byte_against_ratio() {
        assert_eq!(Gender::from_pid(0x0000_001E, 0x1F), Gender::Female);
        assert_eq!(Gender::from_pid(0x0000_001F, 0x1F), Gender::Male);
        assert_eq!(Gender::from_pid(0, GENDER_RATIO_MALE_ONLY), Gender::Male);
        assert_eq!(Gender::from_pid(0xFF, GENDER_RATIO_FEMALE_ONLY), Gender::Female);
        assert_eq!(Gender::from_pid(0, GENDER_RATIO_GENDERLESS), Gender::Genderless);
    }

    #[test]
    fn shiny_threshold_is_exclusive() {
        let id = id32(12345, 54321);
        let pid_hi = 12345u32 ^ 54321;
        assert!(is_shiny(id, pid_hi << 16));
        assert!(is_shiny(id, pid_hi << 16 | 7));
        assert!(!is_shiny(id, pid_hi << 16 | 8));
    }

    #[test]
    fn hidden_power_extremes() {
        assert_eq!(HiddenPowerType::from_iv32(0), HiddenPowerType::Fighting);
        assert_eq!(HiddenPowerType::from_iv32(0x3FFF_FFFF), HiddenPowerType::Dark);
        // 30/30/30/30/30/31 (hp..spd) leaves only SpD odd: 32 * 15 / 63 = 7
        let iv32 = 30 | 30 << 5 | 30 << 10 | 30 << 15 | 30 << 20 | 31 << 25;
        assert_eq!(HiddenPowerType::from_iv32(iv32), HiddenPowerType::Steel);
    }

    #[test]
    fn iv_packing_orders_blocks() {
        let iv1 = 1 | 2 << 5 | 3 << 10;
        let iv2 = 4 | 5 << 5 | 6 << 10;
        assert_eq!(unpack_ivs(pack_ivs(iv1, iv2)), [1, 2, 3, 4, 5, 6]);
    }
}
