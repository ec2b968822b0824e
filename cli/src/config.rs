use std::env;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const JOBS_ENV: &str = "CXD_JOBS";
pub const OUTPUT_ENV: &str = "CXD_OUTPUT";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `key=value` lines
    #[default]
    Text,
    /// Pretty-printed JSON object
    Json,
}

/// Settings taken from the environment; command-line flags override them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub jobs: Option<usize>,
    pub output: OutputFormat,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            jobs: read_env_optional_usize(JOBS_ENV),
            output: read_env_output(OUTPUT_ENV),
        }
    }

    pub fn with_overrides(self, jobs: Option<usize>, output: Option<OutputFormat>) -> Self {
        Self {
            jobs: jobs.filter(|value| *value > 0).or(self.jobs),
            output: output.unwrap_or(self.output),
        }
    }
}

pub(crate) fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

pub(crate) fn read_env_output(name: &str) -> OutputFormat {
    env::var(name)
        .ok()
        .and_then(|value| OutputFormat::from_str(value.trim(), true).ok())
        .unwrap_or_default()
}
