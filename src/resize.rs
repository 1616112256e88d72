//! Validation of user-typed canvas sizes.
//!
//! A resize request is free text from a prompt. It is checked in a fixed order
//! (number, integer, range) and only a fully valid request produces a new grid;
//! the old grid's paint is never carried over.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::grid::{Grid, GridLimits, MAX_CONFIGURABLE_RESOLUTION};

/// Error type for rejected resize requests
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResizeError {
    /// Input does not start with a number
    #[error("'{0}' is not a number")]
    NotANumber(String),
    /// Input is a number with a fractional part
    #[error("{0} is not a whole number")]
    NotInteger(f64),
    /// Input is a whole number outside `1..=max`
    #[error("{value} is outside the allowed range 1-{max}")]
    OutOfRange { value: f64, max: u32 },
}

/// Result of a resize request that was not rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    /// A fresh grid at the requested resolution
    Resized(Grid),
    /// The user dismissed the prompt; nothing changes and nothing is reported
    Cancelled,
}

/// Text shown when asking for a new size.
pub fn prompt_message(max_resolution: u32) -> String {
    format!(
        "Enter the desired side length of the canvas (1-{}). Your current work will be lost!",
        max_resolution
    )
}

/// Text shown after a rejected resize.
pub fn invalid_input_message(max_resolution: u32) -> String {
    format!(
        "Invalid input. Integers in the range 1-{} inclusive only, please.",
        max_resolution
    )
}

fn leading_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)")
            .expect("leading number regex is valid")
    })
}

/// Read the leading decimal number of `input`, ignoring anything after it.
///
/// `"12px"` reads as 12 and `"  3.5 cells"` as 3.5. A leading `Infinity`
/// reads as infinite. Input with no leading number yields `None`.
pub fn parse_leading_number(input: &str) -> Option<f64> {
    let m = leading_number_regex().find(input)?;
    m.as_str().trim_start().parse::<f64>().ok()
}

/// Validate `input` as a side length.
///
/// # Errors
///
/// - `ResizeError::NotANumber` if there is no leading number
/// - `ResizeError::NotInteger` if the number has a fractional part
/// - `ResizeError::OutOfRange` if the number is below 1 or above the limit
pub fn parse_resolution(input: &str, limits: GridLimits) -> Result<u32, ResizeError> {
    let value =
        parse_leading_number(input).ok_or_else(|| ResizeError::NotANumber(input.to_string()))?;

    if value.fract() != 0.0 {
        return Err(ResizeError::NotInteger(value));
    }

    let max = limits.max_resolution.min(MAX_CONFIGURABLE_RESOLUTION);
    if value < 1.0 || value > f64::from(max) {
        return Err(ResizeError::OutOfRange { value, max });
    }

    Ok(value as u32)
}

/// Handle a resize prompt answer.
///
/// `None` (prompt dismissed) and blank input are a cancellation, not an error.
/// On success the returned grid is brand new; `current` is only consulted for
/// diagnostics and is never modified.
pub fn request_resize(
    current: &Grid,
    input: Option<&str>,
    limits: GridLimits,
) -> Result<ResizeOutcome, ResizeError> {
    let Some(text) = input.filter(|t| !t.trim().is_empty()) else {
        log::debug!("resize cancelled");
        return Ok(ResizeOutcome::Cancelled);
    };

    let resolution = parse_resolution(text, limits)?;
    let grid = Grid::new(resolution, limits).map_err(|_| ResizeError::OutOfRange {
        value: f64::from(resolution),
        max: limits.max_resolution,
    })?;

    log::debug!(
        "resized {0}x{0} -> {1}x{1}, discarding {2} painted cells",
        current.resolution(),
        resolution,
        current.painted_count()
    );
    Ok(ResizeOutcome::Resized(grid))
}
