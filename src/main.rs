use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dungeoneer::{
    get_max_value_for_floor, level_summary, GeneratorConfig, Layout, LevelExport, LevelGenerator, LevelRenderer,
    SpawnTables,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::fmt::Debug;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let default_filter = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match matches.subcommand() {
        Some(("generate", sub)) => run_generate(sub),
        Some(("tables", sub)) => run_tables(sub),
        _ => {
            cli().print_help()?;
            Ok(())
        }
    }
}

fn cli() -> Command {
    let floor = Arg::new("floor")
        .long("floor")
        .short('f')
        .value_parser(value_parser!(u32))
        .default_value("1")
        .help("Dungeon floor index");

    Command::new("dungeoneer")
        .about("Procedural dungeon generator for a tile-based roguelike")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log every generation stage"),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate one level and print it")
                .arg(floor.clone())
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .conflicts_with("phrase")
                        .help("Seed for a reproducible level"),
                )
                .arg(
                    Arg::new("phrase")
                        .long("phrase")
                        .help("Derive the seed from a text phrase"),
                )
                .arg(
                    Arg::new("layout")
                        .long("layout")
                        .value_parser(["rect", "cave", "random"])
                        .default_value("random"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON generator configuration"),
                )
                .arg(
                    Arg::new("export")
                        .long("export")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the level as JSON"),
                )
                .arg(
                    Arg::new("no-color")
                        .long("no-color")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tables")
                .about("Show spawn caps and weighted pools for a floor")
                .arg(floor),
        )
}

fn run_generate(matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let tables = SpawnTables::default();
    let generator = LevelGenerator::new(&config, &tables).context("Generator configuration rejected")?;

    let floor = matches.get_one::<u32>("floor").copied().unwrap_or(1);
    let seed = match (matches.get_one::<u64>("seed"), matches.get_one::<String>("phrase")) {
        (Some(seed), _) => *seed,
        (None, Some(phrase)) => phrase_seed(phrase),
        (None, None) => rand::random(),
    };
    info!(seed, floor, "generating level");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let level = match matches.get_one::<String>("layout").map(String::as_str) {
        Some("rect") => generator.generate_layout(Layout::Rectangular, floor, &mut rng),
        Some("cave") => generator.generate_layout(Layout::Cave, floor, &mut rng),
        _ => generator.generate(floor, &mut rng),
    }
    .with_context(|| format!("Failed to generate floor {} from seed {}", floor, seed))?;

    let renderer = LevelRenderer::default();
    let lines = if !matches.get_flag("no-color") && is_stdout_terminal() {
        renderer.render_colored(&level)
    } else {
        renderer.render_lines(&level)
    };
    for line in lines {
        println!("{}", line);
    }
    println!();
    println!("seed {}", seed);
    for line in level_summary(&level) {
        println!("{}", line);
    }

    if let Some(path) = matches.get_one::<PathBuf>("export") {
        LevelExport::new(level, Some(seed)).save(path)?;
        println!("exported to {}", path.display());
    }

    Ok(())
}

fn run_tables(matches: &ArgMatches) -> Result<()> {
    let floor = matches.get_one::<u32>("floor").copied().unwrap_or(1);
    let tables = SpawnTables::default();

    println!("Floor {}", floor);
    println!("=========");
    println!("max monsters per room: {}", get_max_value_for_floor(&tables.max_monsters, floor));
    println!("max items per room:    {}", get_max_value_for_floor(&tables.max_items, floor));
    println!("max traps per room:    {}", get_max_value_for_floor(&tables.max_traps, floor));

    print_pool("Monsters", &tables.monsters.pool_for_floor(floor));
    print_pool("Items", &tables.items.pool_for_floor(floor));
    print_pool("Traps", &tables.traps.pool_for_floor(floor));
    Ok(())
}

fn print_pool<T: Debug>(title: &str, pool: &[(T, u32)]) {
    println!("\n{}:", title);
    let total: u32 = pool.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        println!("  (none unlocked)");
        return;
    }
    for (archetype, weight) in pool {
        println!(
            "  {:<20} {:>3}  {:>5.1}%",
            format!("{:?}", archetype),
            weight,
            *weight as f64 * 100.0 / total as f64
        );
    }
}

/// First eight bytes of the phrase's SHA-256 digest.
fn phrase_seed(phrase: &str) -> u64 {
    let digest = Sha256::digest(phrase.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn is_stdout_terminal() -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::isatty(std::io::stdout().as_raw_fd()) == 1 }
}
