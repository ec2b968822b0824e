#![cfg_attr(not(feature = "std"), no_std)]

pub mod attributes;
pub mod backward;
pub mod constants;
pub mod criteria;
pub mod entity;
pub mod error;
pub mod forward;
pub mod name_screen;
pub mod protocol;
pub mod rng;
pub mod seeds;
pub mod trainer;

pub use attributes::{Gender, HiddenPowerType, Nature, Shiny};
pub use backward::{origin_seed, origin_seed_of_entity, ObservedStarter};
pub use criteria::{Criteria, EncounterCriteria, IvSpec};
pub use entity::{Entity, PersonalInfo, Pokemon};
pub use error::CriteriaError;
pub use name_screen::{find_name_screen_origin, NameScreenOrigin};
pub use protocol::{ColoStarter, StarterKind};
pub use rng::XdRng;
