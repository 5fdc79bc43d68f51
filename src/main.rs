//! mathrun CLI
//!
//! - `mathrun [flags]`: run every topic and write the run file
//! - `mathrun init`: write a commented default `mathrun.toml`

use std::process;

use mathrun::cli::{build_cli, config_path, load_config};
use mathrun::{execute, RunConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    if matches.subcommand_name() == Some("init") {
        let path = config_path(&matches);
        match RunConfig::write_default_if_missing(&path) {
            Ok(true) => eprintln!("Wrote default config to {}", path.display()),
            Ok(false) => eprintln!("{} already exists, left untouched", path.display()),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match execute(&config) {
        Ok(summary) => eprintln!(
            "Wrote {} rows for {} of {} topics to {}",
            summary.rows_written,
            summary.topics_written,
            summary.topics_seen,
            config.output.display()
        ),
        Err(e) => {
            eprintln!("Run aborted: {}", e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr. `RUST_LOG` picks the filter, `info` when unset;
/// `--verbose` forces `debug`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
