//! Replay and blank command implementations

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use crate::config::SketchConfig;
use crate::editor::Editor;
use crate::grid::Grid;
use crate::output::{output_path, save_png};
use crate::resize::{invalid_input_message, parse_resolution};
use crate::session::{parse_stream, replay};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the replay command
pub fn run_replay(
    config: &SketchConfig,
    session: &Path,
    output: Option<&Path>,
    scale: Option<u8>,
    strict: bool,
) -> ExitCode {
    let file = match File::open(session) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: Cannot open session file '{}': {}", session.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let parsed = parse_stream(file);
    let mut all_warnings: Vec<String> =
        parsed.warnings.iter().map(|w| format!("line {}: {}", w.line, w.message)).collect();

    if strict && !all_warnings.is_empty() {
        for warning in &all_warnings {
            eprintln!("Error: {}", warning);
        }
        return ExitCode::from(EXIT_ERROR);
    }

    let mut editor = match Editor::new(config.editor_settings()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let replay_warnings = replay(&mut editor, &parsed.events);
    all_warnings.extend(replay_warnings.iter().map(|w| format!("line {}: {}", w.line, w.message)));

    if strict && !all_warnings.is_empty() {
        for warning in &all_warnings {
            eprintln!("Error: {}", warning);
        }
        return ExitCode::from(EXIT_ERROR);
    }

    let code = save(config, editor.grid(), output, scale);

    for warning in &all_warnings {
        eprintln!("Warning: {}", warning);
    }

    code
}

/// Execute the blank command
pub fn run_blank(
    config: &SketchConfig,
    size: Option<&str>,
    output: Option<&Path>,
    scale: Option<u8>,
) -> ExitCode {
    let limits = config.limits();
    let resolution = match size {
        Some(text) => match parse_resolution(text, limits) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("{}", invalid_input_message(limits.max_resolution));
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
        None => config.grid.default_resolution,
    };

    match Grid::new(resolution, limits) {
        Ok(grid) => save(config, &grid, output, scale),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn save(config: &SketchConfig, grid: &Grid, output: Option<&Path>, scale: Option<u8>) -> ExitCode {
    let path = output_path(output, &config.export.filename);
    let scale = scale.unwrap_or(config.export.scale);

    if let Err(e) = save_png(grid, &path, scale) {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}
