//! Clap command tree and config overrides.
//!
//! Values given on the command line win over `mathrun.toml`, which wins over
//! the profile defaults.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mathrun_core::Result;
use mathrun_engine::{Profile, RunConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("mathrun")
        .about("Generate NTCIR evaluation runs from a text+math search backend")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file (default: ./mathrun.toml if present)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug events")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("topics")
                .long("topics")
                .help("Topic XML file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Run file to write")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("run-tag")
                .long("run-tag")
                .help("Tag written in the last column of every row"),
        )
        .arg(
            Arg::new("backend-url")
                .long("backend-url")
                .help("Search backend endpoint"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("Task profile")
                .value_parser(["ntcir", "wiki"]),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for per-topic filler shuffles")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("filler")
                .long("filler")
                .help("Filler id list used for padding")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-padding")
                .long("no-padding")
                .help("Disable padding")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .help("Threads issuing the queries of one topic")
                .value_parser(value_parser!(usize)),
        )
        .subcommand(Command::new("init").about("Write a commented default config file"))
}

/// Config file path chosen on the command line, or the default name
pub fn config_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load the config file (if any) and apply command-line overrides.
///
/// An explicit `--config` must exist; the default `mathrun.toml` is optional.
pub fn load_config(matches: &ArgMatches) -> Result<RunConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RunConfig::from_file(path)?,
        None if Path::new(CONFIG_FILE_NAME).exists() => {
            RunConfig::from_file(Path::new(CONFIG_FILE_NAME))?
        }
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, matches)?;
    config.validate()?;
    Ok(config)
}

/// Apply command-line values on top of a loaded config
pub fn apply_overrides(config: &mut RunConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(profile) = matches.get_one::<String>("profile") {
        config.profile = profile.parse::<Profile>()?;
    }
    if let Some(path) = matches.get_one::<PathBuf>("topics") {
        config.topics = path.clone();
    }
    if let Some(path) = matches.get_one::<PathBuf>("output") {
        config.output = path.clone();
    }
    if let Some(tag) = matches.get_one::<String>("run-tag") {
        config.run_tag = tag.clone();
    }
    if let Some(url) = matches.get_one::<String>("backend-url") {
        config.backend.url = url.clone();
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.padding.seed = Some(*seed);
    }
    if let Some(path) = matches.get_one::<PathBuf>("filler") {
        config.padding.filler_path = path.clone();
    }
    if matches.get_flag("no-padding") {
        config.padding.enabled = Some(false);
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.concurrency.variant_threads = *threads;
    }
    Ok(())
}
