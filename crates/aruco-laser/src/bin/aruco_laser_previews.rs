use aruco_laser::cli::{run_previews, PreviewArgs};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    run_previews(PreviewArgs::parse())
}
