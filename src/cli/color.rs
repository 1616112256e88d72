//! Color inspection commands (color, names)

use std::process::ExitCode;

use serde_json::json;

use crate::color::{parse_color, to_hex};
use crate::named_colors;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the color command
pub fn run_color(colors: &[String], as_json: bool) -> ExitCode {
    let mut failed = false;
    let mut results = Vec::with_capacity(colors.len());

    for text in colors {
        match parse_color(text) {
            Ok(color) => {
                let [r, g, b, a] = color.0;
                if as_json {
                    results.push(json!({
                        "input": text,
                        "hex": to_hex(color),
                        "rgba": [r, g, b, a],
                    }));
                } else {
                    println!("{} -> {} ({}, {}, {}, {})", text, to_hex(color), r, g, b, a);
                }
            }
            Err(e) => {
                failed = true;
                if as_json {
                    results.push(json!({ "input": text, "error": e.to_string() }));
                } else {
                    eprintln!("Error: {}", e);
                }
            }
        }
    }

    if as_json {
        match serde_json::to_string_pretty(&results) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// Execute the names command
pub fn run_names() -> ExitCode {
    for name in named_colors::names() {
        if let Some(color) = named_colors::lookup(name) {
            println!("{:<22} {}", name, to_hex(color));
        }
    }
    println!("{:<22} {}", "transparent", to_hex(crate::color::TRANSPARENT));
    ExitCode::from(EXIT_SUCCESS)
}
