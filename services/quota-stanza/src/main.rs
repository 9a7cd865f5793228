use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use quota_stanza::stanza::{build_stanza, write_stanza_file, UserSelector, ALL_USERS};
use quota_stanza::{QuotaDatabase, StanzaConfig, StanzaError};

const PROGRAM_NAME: &str = "quota-stanza";
const CONFIGURATION_EXIT_CODE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = PROGRAM_NAME,
    version,
    about = "Creates stanza files for user(s)",
    long_about = "Creates setquota stanza files for user(s) from the quota database.\n\
                  Use 'all' to create it for all users."
)]
struct Cli {
    /// User(s) name to create stanza file for
    #[arg(
        short = 'u',
        long = "user-names",
        value_name = "uname",
        num_args = 1..,
        default_value = ALL_USERS
    )]
    user_names: Vec<String>,

    /// File name for stanza file
    #[arg(short = 'o', long = "output-file", value_name = "fname")]
    output_file: PathBuf,

    /// Quota database file [env: QUOTA_DB_PATH, default: myquotas.db]
    #[arg(short = 'd', long = "database", value_name = "path")]
    database: Option<PathBuf>,
}

fn main() -> ExitCode {
    // a bare invocation shows usage instead of a missing-argument error
    if std::env::args_os().len() == 1 {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{PROGRAM_NAME}: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let cli = Cli::parse();

    let config = StanzaConfig::from_env().with_database(cli.database.clone());
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{PROGRAM_NAME}: {err:#}");
            eprintln!("{}  for help use --help", " ".repeat(PROGRAM_NAME.len()));
            return ExitCode::from(CONFIGURATION_EXIT_CODE);
        }
    };

    if let Err(err) = init_tracing(&config.log_level) {
        eprintln!("{PROGRAM_NAME}: {err:#}");
        return ExitCode::from(CONFIGURATION_EXIT_CODE);
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{PROGRAM_NAME}: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli, config: &StanzaConfig) -> Result<(), StanzaError> {
    info!(
        database = %config.database_path.display(),
        output = %cli.output_file.display(),
        "creating stanza file"
    );

    let database = QuotaDatabase::open(&config.database_path)?;
    let selector = UserSelector::from_names(cli.user_names.iter().cloned());
    let lines = build_stanza(&database, &selector)?;
    write_stanza_file(&lines, &cli.output_file)?;

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
