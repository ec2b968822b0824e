use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use cxd_core::{EncounterCriteria, Gender, HiddenPowerType, IvSpec, Nature, Shiny};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliGender {
    Male,
    Female,
    Genderless,
}

impl From<CliGender> for Gender {
    fn from(value: CliGender) -> Self {
        match value {
            CliGender::Male => Gender::Male,
            CliGender::Female => Gender::Female,
            CliGender::Genderless => Gender::Genderless,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliShiny {
    Random,
    Never,
    Always,
}

impl From<CliShiny> for Shiny {
    fn from(value: CliShiny) -> Self {
        match value {
            CliShiny::Random => Shiny::Random,
            CliShiny::Never => Shiny::Never,
            CliShiny::Always => Shiny::Always,
        }
    }
}

/// Criteria flags shared by every `generate` mode. Flags win over the JSON file.
#[derive(Args, Clone, Debug, Default)]
pub struct CriteriaArgs {
    /// JSON file deserialized into the criteria before flags are applied
    #[arg(long)]
    pub criteria: Option<PathBuf>,
    #[arg(long)]
    pub nature: Option<Nature>,
    #[arg(long, value_enum)]
    pub gender: Option<CliGender>,
    #[arg(long)]
    pub hidden_power: Option<HiddenPowerType>,
    #[arg(long, value_enum)]
    pub shiny: Option<CliShiny>,
    /// `hp/atk/def/spa/spd/spe`, with `x` for unspecified stats
    #[arg(long)]
    pub ivs: Option<IvSpec>,
}

impl CriteriaArgs {
    pub fn resolve(&self) -> Result<EncounterCriteria> {
        let base = match &self.criteria {
            Some(path) => load_criteria(path)?,
            None => EncounterCriteria::default(),
        };
        let criteria = EncounterCriteria {
            nature: self.nature.or(base.nature),
            gender: self.gender.map(Gender::from).or(base.gender),
            hidden_power: self.hidden_power.or(base.hidden_power),
            shiny: self.shiny.map(Shiny::from).unwrap_or(base.shiny),
            ivs: self.ivs.unwrap_or(base.ivs),
        };
        criteria.validate()?;
        Ok(criteria)
    }
}

pub fn load_criteria(path: &Path) -> Result<EncounterCriteria> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading criteria file {}", path.display()))?;
    let criteria: EncounterCriteria = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing criteria file {}", path.display()))?;
    criteria
        .validate()
        .with_context(|| format!("invalid criteria in {}", path.display()))?;
    Ok(criteria)
}
