use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use roster_cli::{load_config, run_normalize, run_validate, ValidateArgs};
use roster_model::EntityKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("roster")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate client/worker/task workbook snapshots")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more to stderr (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a workbook snapshot")
                .arg(
                    Arg::new("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON object of sheet name to row array"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML validator config"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the report as JSON"),
                )
                .arg(
                    Arg::new("write-repaired")
                        .long("write-repaired")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the snapshot after AttributesJSON repair"),
                )
                .arg(
                    Arg::new("emit-normalized")
                        .long("emit-normalized")
                        .action(ArgAction::SetTrue)
                        .help("Also print the typed collections"),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print the stored form of a single edited cell")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .value_parser(["client", "worker", "task"])
                        .help("Entity kind of the edited sheet"),
                )
                .arg(
                    Arg::new("column")
                        .long("column")
                        .required(true)
                        .help("Column name (case-insensitive)"),
                )
                .arg(
                    Arg::new("value")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Cell text as typed"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML validator config"),
                ),
        )
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `Ok(false)` means the command ran but the data is invalid
fn run(matches: &ArgMatches) -> Result<bool> {
    let mut stdout = std::io::stdout().lock();
    match matches.subcommand() {
        Some(("validate", args)) => {
            let validate = ValidateArgs {
                snapshot: args
                    .get_one::<PathBuf>("snapshot")
                    .cloned()
                    .context("missing snapshot path")?,
                config: args.get_one::<PathBuf>("config").cloned(),
                json: args.get_flag("json"),
                write_repaired: args.get_one::<PathBuf>("write-repaired").cloned(),
                emit_normalized: args.get_flag("emit-normalized"),
            };
            run_validate(&validate, &mut stdout)
        }
        Some(("normalize", args)) => {
            let kind: EntityKind = args
                .get_one::<String>("kind")
                .context("missing --kind")?
                .parse()?;
            let column = args.get_one::<String>("column").context("missing --column")?;
            let value = args.get_one::<String>("value").context("missing value")?;
            let config = load_config(args.get_one::<PathBuf>("config"))?;
            run_normalize(kind, column, value, &config, &mut stdout)?;
            Ok(true)
        }
        _ => Ok(true),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
