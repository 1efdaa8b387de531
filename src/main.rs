extern crate env_logger;
extern crate log;

use std::{
    fs::File,
    io::{
        self,
        BufRead,
        BufReader,
    },
    path::PathBuf,
    process::ExitCode,
};

use clap::{
    self,
    Parser,
    ValueHint,
};
use log::*;

use nimmt::client::{
    common::ClientCommonArgs,
    Client,
    GameSummary,
};

/// A 6 nimmt! client bot speaking the line protocol over stdin/stdout.
#[derive(Parser)]
#[clap(version)]
pub struct AppArgs {
    #[clap(flatten)]
    common: ClientCommonArgs,

    /// the file replayed as server input in test mode
    #[clap(
        long,
        value_parser,
        value_hint=ValueHint::FilePath,
        default_value = "tests/harness.stdin"
    )]
    input: PathBuf,

    /// print the final report as JSON
    #[clap(long, value_parser, default_value_t = false)]
    json: bool,
}

fn open_input(args: &AppArgs) -> io::Result<Box<dyn BufRead>> {
    if args.common.test {
        info!("Reading server messages from {:?}", args.input);
        Ok(Box::new(BufReader::new(File::open(&args.input)?)))
    } else {
        Ok(Box::new(io::stdin().lock()))
    }
}

fn report(summary: &GameSummary, json: bool) {
    if json {
        match serde_json::to_string(summary) {
            Ok(s) => info!("{}", s),
            Err(e) => error!("Failed to serialize the report: {}", e),
        }
        return;
    }
    info!("Final scores:");
    info!("{}", summary);
}

fn main() -> ExitCode {
    // Initialize env_logger with a default log level of INFO.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    let config = args.common.to_config();
    for name in config.strategies.unknown_weight_names() {
        warn!("Ignoring the weight for an unknown strategy: {}", name);
    }

    let input = match open_input(&args) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to open {:?}: {}", args.input, e);
            return ExitCode::FAILURE;
        }
    };

    let mut client = Client::new(config);
    match client.start(input, io::stdout().lock()) {
        Ok(summary) => {
            report(&summary, args.json);
            ExitCode::SUCCESS
        }
        Err(_) => {
            error!("Something has gone wrong:\n{}", client.get_state().get_status());
            ExitCode::FAILURE
        }
    }
}
