// Generator constants for the Colosseum / XD linear congruential generator.

pub const MULT: u32 = 0x0003_43FD;
pub const ADD: u32 = 0x0026_9EC3;
pub const MULT_INV: u32 = 0xB9B3_3155;
pub const ADD_INV: u32 = 0xA170_F641;

// Seed recovery buffer capacities. The chained bounds were checked over every input.
pub const MAX_SEEDS_PID: usize = 2;
pub const MAX_SEEDS_IV: usize = 6;
pub const MAX_SEEDS_SINGLE: usize = 0x1_0000;

pub const IV_MASK: u16 = 0x7FFF;

// Name entry screen
pub const NAME_SCREEN_SKIP_THRESHOLD: u16 = 0x1999; // rand() / 10 == 0
pub const NAME_SCREEN_ACCEPTS: usize = 4;
pub const NAME_SCREEN_MAX_DEPTH: u8 = 4;
pub const TRAINER_ID_ADVANCES: u32 = 1000;

// Starter call counts, measured from the seed preceding the TID draw.
pub const STARTER_IV_OFFSET: u32 = 4; // tid, sid, fake pid x2
pub const STARTER_PID_OFFSET: u32 = 7; // + iv1, iv2, ability
pub const STARTER_REPEAT_OFFSET: u32 = 5; // fake pid x2, iv1, iv2, ability
pub const FAKE_PID_CALLS: u32 = 2;
pub const IVS_TO_PID_CALLS: u32 = 3; // iv1, iv2, ability

pub const SHINY_THRESHOLD: u32 = 8;
pub const NATURE_COUNT: u32 = 25;

pub const GENDER_RATIO_MALE_87_5: u8 = 0x1F;
pub const GENDER_RATIO_MALE_ONLY: u8 = 0x00;
pub const GENDER_RATIO_FEMALE_ONLY: u8 = 0xFE;
pub const GENDER_RATIO_GENDERLESS: u8 = 0xFF;

pub const SPECIES_EEVEE: u16 = 133;
pub const SPECIES_ESPEON: u16 = 196;
pub const SPECIES_UMBREON: u16 = 197;

pub const ABILITY_SYNCHRONIZE: u16 = 28;
pub const ABILITY_RUN_AWAY: u16 = 50;
