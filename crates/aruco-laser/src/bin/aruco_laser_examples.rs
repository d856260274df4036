use aruco_laser::cli::{run_examples, ExamplesArgs};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    run_examples(ExamplesArgs::parse())
}
