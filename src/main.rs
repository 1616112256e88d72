//! Sketchgrid - command-line tool for painting and saving pixel canvases

use std::process::ExitCode;

use sketchgrid::cli;

fn main() -> ExitCode {
    cli::run()
}
