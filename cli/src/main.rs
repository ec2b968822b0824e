use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cxd_core::attributes::pack_ivs;
use cxd_core::constants::{MAX_SEEDS_IV, MAX_SEEDS_SINGLE};
use cxd_core::forward::{
    set_colo_starter_first_from_ivs, set_colo_starter_from_trainer_id,
    set_colo_starter_second_from_ivs, set_from_ivs, set_random_colo, set_random_xd,
    set_random_xd_starter, set_xd_starter_from_ivs, set_xd_starter_from_trainer_id,
};
use cxd_core::protocol::{colo_starters, xd_starter, StarterTrace};
use cxd_core::rng::{high16, next_k, prev_k};
use cxd_core::seeds::{recover, recover_ivs};
use cxd_core::trainer::{find_shiny_sid, trainer_id_origin};
use cxd_core::{
    origin_seed_of_entity, ColoStarter, IvSpec, NameScreenOrigin, PersonalInfo, Pokemon,
    StarterKind,
};
use cxd_cli::config::{CliConfig, OutputFormat};
use cxd_cli::criteria::CriteriaArgs;
use cxd_cli::report::Report;
use cxd_cli::scan::{depth_histogram, scan_sids};
use cxd_cli::util::{parse_seed, parse_u16, seed_to_hex};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cxd")]
#[command(about = "Seed tooling for the Colosseum / XD generator: step, recover, generate, trace")]
struct Cli {
    /// Output format (defaults to CXD_OUTPUT, then text)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Advance or rewind a seed by a number of calls
    Step {
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value_t = false)]
        back: bool,
    },
    /// Recover states whose high 16 bits read one or two consecutive values
    RecoverPid {
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: Option<String>,
    },
    /// Recover seeds that draw the given six IVs
    RecoverIvs {
        /// `hp/atk/def/spa/spd/spe`
        #[arg(long)]
        ivs: IvSpec,
    },
    /// Replay the starter sequence from the seed preceding the TID draw
    Starters {
        #[arg(long, value_enum)]
        game: CliGame,
        #[arg(long)]
        seed: String,
    },
    /// Recover the origin seed of an observed starter
    Origin {
        #[arg(long, value_enum)]
        starter: CliStarter,
        #[arg(long)]
        tid: String,
        #[arg(long)]
        sid: String,
        #[arg(long)]
        pid: String,
        #[arg(long)]
        ivs: IvSpec,
    },
    /// Check whether trainer IDs can follow the name screen
    TrainerOrigin {
        #[arg(long)]
        tid: String,
        #[arg(long)]
        sid: String,
    },
    /// Find a reachable SID that makes a PID shiny for a TID
    ShinySid {
        #[arg(long)]
        tid: String,
        #[arg(long)]
        pid: String,
        #[arg(long, default_value_t = 0)]
        bits: u32,
    },
    /// Test every SID of a TID for name-screen reachability
    ScanSids {
        #[arg(long)]
        tid: String,
        /// Worker threads (defaults to CXD_JOBS, then rayon's choice)
        #[arg(long)]
        jobs: Option<usize>,
        /// Include every reachable SID in the output
        #[arg(long, default_value_t = false)]
        list: bool,
    },
    /// Run one constrained generation protocol
    Generate {
        #[arg(long, value_enum)]
        mode: CliMode,
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[arg(long)]
        tid: Option<String>,
        #[arg(long)]
        sid: Option<String>,
        /// Seed for the random modes (random when omitted)
        #[arg(long)]
        seed: Option<String>,
        /// Colosseum starter for the starter modes
        #[arg(long, value_enum, default_value_t = CliColoStarter::Umbreon)]
        starter: CliColoStarter,
        /// Species number stored on the result for regular modes
        #[arg(long, default_value_t = 0)]
        species: u16,
        /// Gender ratio byte for regular modes
        #[arg(long, default_value_t = 0x7F)]
        gender_ratio: u8,
        /// Ability ids for slots 0 and 1 (regular modes)
        #[arg(long, value_delimiter = ',', default_value = "0,0")]
        abilities: Vec<u16>,
        /// Reroll shiny PIDs in the regular IV mode
        #[arg(long, default_value_t = false)]
        no_shiny: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliGame {
    Colo,
    Xd,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliStarter {
    Umbreon,
    Espeon,
    Eevee,
}

impl From<CliStarter> for StarterKind {
    fn from(value: CliStarter) -> Self {
        match value {
            CliStarter::Umbreon => StarterKind::Umbreon,
            CliStarter::Espeon => StarterKind::Espeon,
            CliStarter::Eevee => StarterKind::Eevee,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliColoStarter {
    Umbreon,
    Espeon,
}

impl From<CliColoStarter> for ColoStarter {
    fn from(value: CliColoStarter) -> Self {
        match value {
            CliColoStarter::Umbreon => ColoStarter::Umbreon,
            CliColoStarter::Espeon => ColoStarter::Espeon,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMode {
    /// Wild or trainer encounter from six IVs, trainer IDs required
    Regular,
    /// Colosseum starter from trainer IDs
    ColoStarterTid,
    /// Colosseum starter from six IVs
    ColoStarterIvs,
    /// XD Eevee from trainer IDs
    XdStarterTid,
    /// XD Eevee from six IVs
    XdStarterIvs,
    /// XD Eevee with trainer IDs drawn from a seed
    RandomXdStarter,
    /// Colosseum encounter drawn from a seed, trainer IDs required
    RandomColo,
    /// XD encounter drawn from a seed, trainer IDs required
    RandomXd,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli { format, command } = Cli::parse();
    let config = CliConfig::from_env().with_overrides(None, format);

    let mut report = Report::new();
    match command {
        Commands::Step { seed, count, back } => {
            let seed = parse_seed(&seed)?;
            let result = if back {
                prev_k(seed, count)
            } else {
                next_k(seed, count)
            };
            report
                .field("seed", seed_to_hex(seed))?
                .field("count", count)?
                .field("direction", if back { "back" } else { "forward" })?
                .field("result", seed_to_hex(result))?
                .field("high16", high16(result))?;
        }
        Commands::RecoverPid { first, second } => {
            let first = parse_u16(&first)?;
            let second = second.as_deref().map(parse_u16).transpose()?;
            let mut seeds = vec![0u32; MAX_SEEDS_SINGLE];
            let count = recover(&mut seeds, first, second);
            report.field("count", count)?;
            if second.is_some() {
                let hex: Vec<String> = seeds[..count].iter().map(|&s| seed_to_hex(s)).collect();
                report.field("seeds", hex)?;
            } else if count > 0 {
                report
                    .field("first_seed", seed_to_hex(seeds[0]))?
                    .field("last_seed", seed_to_hex(seeds[count - 1]))?;
            }
        }
        Commands::RecoverIvs { ivs } => {
            let (iv1, iv2) = ivs
                .combined()
                .ok_or_else(|| anyhow!("recover-ivs needs all six IVs"))?;
            let mut seeds = [0u32; MAX_SEEDS_IV];
            let count = recover_ivs(&mut seeds, iv1, iv2);
            let hex: Vec<String> = seeds[..count].iter().map(|&s| seed_to_hex(s)).collect();
            report
                .field("iv1", iv1)?
                .field("iv2", iv2)?
                .field("count", count)?
                .field("seeds", hex)?;
        }
        Commands::Starters { game, seed } => {
            let origin = parse_seed(&seed)?;
            match game {
                CliGame::Colo => {
                    let trace = colo_starters(origin);
                    report
                        .field("origin", seed_to_hex(origin))?
                        .field("tid", trace.tid)?
                        .field("sid", trace.sid)?;
                    push_trace(&mut report, "umbreon", &trace.umbreon)?;
                    push_trace(&mut report, "espeon", &trace.espeon)?;
                }
                CliGame::Xd => {
                    let trace = xd_starter(origin);
                    report
                        .field("origin", seed_to_hex(origin))?
                        .field("tid", trace.tid)?
                        .field("sid", trace.sid)?;
                    push_trace(&mut report, "eevee", &trace.eevee)?;
                }
            }
        }
        Commands::Origin {
            starter,
            tid,
            sid,
            pid,
            ivs,
        } => {
            let (iv1, iv2) = ivs
                .combined()
                .ok_or_else(|| anyhow!("origin needs all six IVs"))?;
            let kind: StarterKind = starter.into();
            let pk = Pokemon {
                pid: parse_seed(&pid)?,
                iv32: pack_ivs(iv1, iv2),
                ..Pokemon::with_trainer(kind.species(), parse_u16(&tid)?, parse_u16(&sid)?)
            };
            let found = origin_seed_of_entity(kind, &pk);
            report.field("found", found.is_some())?;
            if let Some(origin) = found {
                report.field("origin", seed_to_hex(origin))?;
                push_name_screen(&mut report, trainer_id_origin(pk.tid, pk.sid))?;
            }
        }
        Commands::TrainerOrigin { tid, sid } => {
            let (tid, sid) = (parse_u16(&tid)?, parse_u16(&sid)?);
            report.field("tid", tid)?.field("sid", sid)?;
            push_name_screen(&mut report, trainer_id_origin(tid, sid))?;
        }
        Commands::ShinySid { tid, pid, bits } => {
            let tid = parse_u16(&tid)?;
            let pid = parse_seed(&pid)?;
            let xor = tid ^ (pid >> 16) as u16 ^ pid as u16;
            let sid = find_shiny_sid(tid, xor, bits);
            report
                .field("tid", tid)?
                .field("pid", seed_to_hex(pid))?
                .field("found", sid.is_some())?;
            if let Some(sid) = sid {
                report.field("sid", sid)?;
            }
        }
        Commands::ScanSids { tid, jobs, list } => {
            let tid = parse_u16(&tid)?;
            let jobs = config.with_overrides(jobs, None).jobs;
            let hits = scan_sids(tid, jobs)?;
            report
                .field("tid", tid)?
                .field("reachable", hits.len())?
                .field("by_depth", depth_histogram(&hits))?;
            if list {
                let sids: Vec<u16> = hits.iter().map(|hit| hit.sid).collect();
                report.field("sids", sids)?;
            }
        }
        Commands::Generate {
            mode,
            criteria,
            tid,
            sid,
            seed,
            starter,
            species,
            gender_ratio,
            abilities,
            no_shiny,
        } => {
            let criteria = criteria.resolve()?;
            let trainer = match (tid.as_deref(), sid.as_deref()) {
                (Some(tid), Some(sid)) => Some((parse_u16(tid)?, parse_u16(sid)?)),
                (None, None) => None,
                _ => return Err(anyhow!("--tid and --sid must be given together")),
            };
            let require_trainer =
                || trainer.ok_or_else(|| anyhow!("{mode:?} needs --tid and --sid"));
            let seed = match seed {
                Some(seed) => parse_seed(&seed)?,
                None => rand::random::<u32>(),
            };
            let personal = PersonalInfo {
                gender: gender_ratio,
                abilities: [
                    abilities.first().copied().unwrap_or(0),
                    abilities.get(1).copied().unwrap_or(0),
                ],
            };
            let starter = ColoStarter::from(starter);

            let (pk, origin, found) = match mode {
                CliMode::Regular => {
                    let (tid, sid) = require_trainer()?;
                    let mut pk = Pokemon::with_trainer(species, tid, sid);
                    let found = set_from_ivs(&mut pk, &criteria, &personal, no_shiny);
                    (pk, None, found)
                }
                CliMode::ColoStarterTid => {
                    let (tid, sid) = require_trainer()?;
                    let mut pk = Pokemon::new(starter.species());
                    let found =
                        set_colo_starter_from_trainer_id(&mut pk, &criteria, starter, tid, sid);
                    (pk, None, found)
                }
                CliMode::ColoStarterIvs => {
                    let mut pk = Pokemon::new(starter.species());
                    let found = match starter {
                        ColoStarter::Umbreon => {
                            set_colo_starter_first_from_ivs(&mut pk, &criteria)
                        }
                        ColoStarter::Espeon => {
                            set_colo_starter_second_from_ivs(&mut pk, &criteria)
                        }
                    };
                    (pk, None, found)
                }
                CliMode::XdStarterTid => {
                    let (tid, sid) = require_trainer()?;
                    let mut pk = Pokemon::new(StarterKind::Eevee.species());
                    let found = set_xd_starter_from_trainer_id(&mut pk, &criteria, tid, sid);
                    (pk, None, found)
                }
                CliMode::XdStarterIvs => {
                    let mut pk = Pokemon::new(StarterKind::Eevee.species());
                    let found = set_xd_starter_from_ivs(&mut pk, &criteria);
                    (pk, None, found)
                }
                CliMode::RandomXdStarter => {
                    let mut pk = Pokemon::new(StarterKind::Eevee.species());
                    let origin = set_random_xd_starter(&mut pk, &criteria, seed);
                    (pk, Some(origin), true)
                }
                CliMode::RandomColo => {
                    let (tid, sid) = require_trainer()?;
                    let mut pk = Pokemon::with_trainer(species, tid, sid);
                    let origin = set_random_colo(&mut pk, &criteria, &personal, seed);
                    (pk, Some(origin), true)
                }
                CliMode::RandomXd => {
                    let (tid, sid) = require_trainer()?;
                    let mut pk = Pokemon::with_trainer(species, tid, sid);
                    let origin = set_random_xd(&mut pk, &criteria, &personal, seed);
                    (pk, Some(origin), true)
                }
            };

            info!(?mode, found, "generation finished");
            report.field("found", found)?;
            if found {
                let ratio = PersonalInfo::for_species(pk.species)
                    .map_or(personal.gender, |info| info.gender);
                push_pokemon(&mut report, &pk, ratio)?;
                if let Some(origin) = origin {
                    report.field("origin", seed_to_hex(origin))?;
                }
            }
        }
    }

    println!("{}", report.render(config.output)?);
    Ok(())
}

fn push_trace(report: &mut Report, name: &str, trace: &StarterTrace) -> Result<()> {
    let ivs = IvSpec::from_iv32(pack_ivs(trace.iv1, trace.iv2));
    report
        .field(&format!("{name}_pid"), seed_to_hex(trace.pid))?
        .field(&format!("{name}_ivs"), format_ivs(&ivs))?
        .field(&format!("{name}_pid_seed"), seed_to_hex(trace.pid_seed))?;
    Ok(())
}

fn push_name_screen(report: &mut Report, found: Option<NameScreenOrigin>) -> Result<()> {
    report.field("reachable", found.is_some())?;
    if let Some(found) = found {
        report
            .field("name_screen_seed", seed_to_hex(found.origin))?
            .field("skip_runs", found.depth)?;
    }
    Ok(())
}

fn push_pokemon(report: &mut Report, pk: &Pokemon, gender_ratio: u8) -> Result<()> {
    let ivs = IvSpec::from_iv32(pk.iv32);
    report
        .field("species", pk.species)?
        .field("pid", seed_to_hex(pk.pid))?
        .field("nature", pk.nature())?
        .field("gender", pk.gender(gender_ratio))?
        .field("shiny", pk.is_shiny())?
        .field("ivs", format_ivs(&ivs))?
        .field("hidden_power", pk.hidden_power())?
        .field("ability_slot", pk.ability_slot)?
        .field("ability", pk.ability)?
        .field("tid", pk.tid)?
        .field("sid", pk.sid)?;
    Ok(())
}

fn format_ivs(ivs: &IvSpec) -> String {
    [ivs.hp, ivs.atk, ivs.def, ivs.spa, ivs.spd, ivs.spe]
        .map(|iv| iv.map_or_else(|| "x".to_string(), |iv| iv.to_string()))
        .join("/")
}
