use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use bg_cutout_rs::{
    runner::{missing_input_message, success_message},
    tracing_config, u2net_runner, BgRemoveError, Config,
};

/// Removes the background from the image compiled into this binary.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {}

fn main() -> Result<ExitCode> {
    Cli::parse();
    tracing_config::init()?;

    let runner = u2net_runner(Config::compiled());
    match runner.execute() {
        Ok(output_path) => {
            println!("{}", success_message(&output_path));
            Ok(ExitCode::SUCCESS)
        }
        Err(BgRemoveError::MissingInput { path }) => {
            println!("{}", missing_input_message(&path));
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}
