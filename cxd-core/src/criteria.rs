//! Target constraints handed to the generator protocols.

use serde::{Deserialize, Serialize};

use crate::attributes::{unpack_ivs, Gender, HiddenPowerType, Nature, Shiny};
use crate::error::CriteriaError;

/// Predicates the protocols test candidates against. Unspecified constraints are
/// always satisfied. Implementations are never mutated by a search.
pub trait Criteria {
    fn is_satisfied_nature(&self, nature: Nature) -> bool;
    fn is_satisfied_gender(&self, gender: Gender) -> bool;
    fn is_satisfied_hidden_power(&self, iv32: u32) -> bool;
    fn is_satisfied_ivs(&self, iv32: u32) -> bool;
    fn specified_iv_count(&self) -> usize;
    /// `(iv1, iv2)` blocks, only when all six IVs are specified.
    fn combined_ivs(&self) -> Option<(u16, u16)>;
    fn shiny(&self) -> Shiny;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSpec {
    pub hp: Option<u8>,
    pub atk: Option<u8>,
    pub def: Option<u8>,
    pub spa: Option<u8>,
    pub spd: Option<u8>,
    pub spe: Option<u8>,
}

impl IvSpec {
    pub const fn all(hp: u8, atk: u8, def: u8, spa: u8, spd: u8, spe: u8) -> Self {
        Self {
            hp: Some(hp),
            atk: Some(atk),
            def: Some(def),
            spa: Some(spa),
            spd: Some(spd),
            spe: Some(spe),
        }
    }

    /// Fully specified spec for the IVs stored in a packed word.
    pub fn from_iv32(iv32: u32) -> Self {
        let [hp, atk, def, spe, spa, spd] = unpack_ivs(iv32).map(|iv| iv as u8);
        Self::all(hp, atk, def, spa, spd, spe)
    }

    fn named(&self) -> [(&'static str, Option<u8>); 6] {
        [
            ("hp", self.hp),
            ("atk", self.atk),
            ("def", self.def),
            ("spa", self.spa),
            ("spd", self.spd),
            ("spe", self.spe),
        ]
    }

    pub fn specified_count(&self) -> usize {
        self.named().iter().filter(|(_, iv)| iv.is_some()).count()
    }

    pub fn validate(&self) -> Result<(), CriteriaError> {
        for (stat, iv) in self.named() {
            if let Some(value) = iv.filter(|value| *value > 31) {
                return Err(CriteriaError::IvOutOfRange { stat, value });
            }
        }
        Ok(())
    }

    /// `(iv1, iv2)` blocks. `None` unless all six IVs are given and in range.
    pub fn combined(&self) -> Option<(u16, u16)> {
        let in_range = |iv: Option<u8>| iv.filter(|value| *value <= 31);
        let (hp, atk, def) = (in_range(self.hp)?, in_range(self.atk)?, in_range(self.def)?);
        let (spa, spd, spe) = (in_range(self.spa)?, in_range(self.spd)?, in_range(self.spe)?);
        let iv1 = hp as u16 | (atk as u16) << 5 | (def as u16) << 10;
        let iv2 = spe as u16 | (spa as u16) << 5 | (spd as u16) << 10;
        Some((iv1, iv2))
    }

    pub fn matches(&self, iv32: u32) -> bool {
        let [hp, atk, def, spe, spa, spd] = unpack_ivs(iv32);
        let pairs = [
            (self.hp, hp),
            (self.atk, atk),
            (self.def, def),
            (self.spa, spa),
            (self.spd, spd),
            (self.spe, spe),
        ];
        pairs
            .iter()
            .all(|(want, have)| want.is_none_or(|want| want as u32 == *have))
    }
}

impl core::str::FromStr for IvSpec {
    type Err = CriteriaError;

    /// Parses `hp/atk/def/spa/spd/spe`; `x` or `-` leaves a stat unspecified.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        const STATS: [&str; 6] = ["hp", "atk", "def", "spa", "spd", "spe"];

        let parts = value.trim().split('/').count();
        if parts != STATS.len() {
            return Err(CriteriaError::MalformedIvs { parts });
        }

        let mut ivs = [None; 6];
        for ((slot, token), stat) in ivs.iter_mut().zip(value.trim().split('/')).zip(STATS) {
            let token = token.trim();
            if matches!(token, "x" | "X" | "-" | "") {
                continue;
            }
            let iv = token
                .parse::<u8>()
                .map_err(|_| CriteriaError::InvalidIv { stat })?;
            *slot = Some(iv);
        }

        let [hp, atk, def, spa, spd, spe] = ivs;
        let spec = Self {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Plain-data criteria, deserializable from JSON with every field optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterCriteria {
    pub nature: Option<Nature>,
    pub gender: Option<Gender>,
    pub hidden_power: Option<HiddenPowerType>,
    pub shiny: Shiny,
    pub ivs: IvSpec,
}

impl EncounterCriteria {
    pub fn validate(&self) -> Result<(), CriteriaError> {
        self.ivs.validate()
    }
}

impl Criteria for EncounterCriteria {
    fn is_satisfied_nature(&self, nature: Nature) -> bool {
        self.nature.is_none_or(|want| want == nature)
    }

    fn is_satisfied_gender(&self, gender: Gender) -> bool {
        self.gender.is_none_or(|want| want == gender)
    }

    fn is_satisfied_hidden_power(&self, iv32: u32) -> bool {
        self.hidden_power
            .is_none_or(|want| want == HiddenPowerType::from_iv32(iv32))
    }

    fn is_satisfied_ivs(&self, iv32: u32) -> bool {
        self.ivs.matches(iv32)
    }

    fn specified_iv_count(&self) -> usize {
        self.ivs.specified_count()
    }

    fn combined_ivs(&self) -> Option<(u16, u16)> {
        self.ivs.combined()
    }

    fn shiny(&self) -> Shiny {
        self.shiny
    }
}
