use core::fmt;

/// Problems with caller-supplied criteria. Search exhaustion is never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CriteriaError {
    IvOutOfRange { stat: &'static str, value: u8 },
    UnknownNature,
    UnknownHiddenPowerType,
    MalformedIvs { parts: usize },
    InvalidIv { stat: &'static str },
}

impl fmt::Display for CriteriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IvOutOfRange { stat, value } => {
                write!(f, "{stat} IV out of range: {value} (allowed 0..=31)")
            }
            Self::UnknownNature => write!(f, "unknown nature"),
            Self::UnknownHiddenPowerType => write!(f, "unknown hidden power type"),
            Self::MalformedIvs { parts } => write!(
                f,
                "expected 6 IVs as hp/atk/def/spa/spd/spe, got {parts} parts"
            ),
            Self::InvalidIv { stat } => write!(f, "{stat} IV is not a number"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CriteriaError {}
