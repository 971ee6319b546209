use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use cable2text::config::{load_config_file, ConvertOptions};
use cable2text::convert::convert_tree;
use cable2text::paths::normalize_output_root;
use cable2text::ConvertSummary;

const EXIT_BAD_FLAGS: u8 = 1;
const EXIT_BAD_ARG_COUNT: u8 = 2;
const EXIT_FATAL: u8 = 3;

/// Parsed command line
#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    input: PathBuf,
    output: PathBuf,
    width: Option<i64>,
    debug: bool,
}

/// Ways the command line can end the program before any work is done.
#[derive(Debug)]
enum CliExit {
    Help(String),
    BadFlags(String),
    BadArgCount(String),
}

impl CliExit {
    fn code(&self) -> u8 {
        match self {
            CliExit::Help(_) => 0,
            CliExit::BadFlags(_) => EXIT_BAD_FLAGS,
            CliExit::BadArgCount(_) => EXIT_BAD_ARG_COUNT,
        }
    }

    fn report(self) -> ExitCode {
        let code = self.code();
        match self {
            CliExit::Help(text) => print!("{text}"),
            CliExit::BadFlags(text) => eprint!("{text}"),
            CliExit::BadArgCount(usage) => {
                eprintln!("expected exactly two directories\n");
                eprintln!("{usage}");
            }
        }
        ExitCode::from(code)
    }
}

fn build_cli() -> Command {
    Command::new("cable2text")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert cable HTML files to plain text, mirroring the directory tree below 'cable'.")
        .arg(
            Arg::new("dirs")
                .help("/path/to/cable followed by /path/to/save")
                .value_name("DIR")
                .num_args(0..),
        )
        .arg(
            Arg::new("width")
                .short('s')
                .value_name("WIDTH")
                .help("Column to break body text at; 0 disables wrapping (default 80)")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

fn parse_cli<I, T>(args: I) -> Result<CliArgs, CliExit>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = build_cli();
    let matches = match cmd.try_get_matches_from_mut(args) {
        Ok(m) => m,
        Err(err) => {
            return Err(match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CliExit::Help(err.to_string()),
                _ => CliExit::BadFlags(err.to_string()),
            })
        }
    };

    let dirs: Vec<&String> = matches
        .get_many::<String>("dirs")
        .unwrap_or_default()
        .collect();
    let [input, output] = dirs.as_slice() else {
        return Err(CliExit::BadArgCount(cmd.render_usage().to_string()));
    };

    Ok(CliArgs {
        input: PathBuf::from(input),
        output: normalize_output_root(output),
        width: matches.get_one::<i64>("width").copied(),
        debug: matches.get_flag("debug"),
    })
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &CliArgs) -> Result<ConvertSummary> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let options = ConvertOptions::resolve(args.width, load_config_file(&cwd)?);

    let summary = convert_tree(&args.input, &args.output, &options)?;
    if summary.failed > 0 {
        warn!(failed = summary.failed, "some cables could not be converted");
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let args = match parse_cli(std::env::args_os()) {
        Ok(args) => args,
        Err(exit) => return exit.report(),
    };
    init_logging(args.debug);

    match run(&args) {
        Ok(summary) => {
            println!("converted {} cables", summary.converted);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
