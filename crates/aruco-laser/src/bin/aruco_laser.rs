use aruco_laser::cli::{run_generate, GenerateArgs};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    run_generate(GenerateArgs::parse())
}
