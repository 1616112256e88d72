//! Sketchgrid - square pixel-art canvas with raster export
//!
//! This library provides functionality to:
//! - Parse CSS color strings (hex, `rgb()`/`rgba()`, named colors) into RGBA
//! - Keep a square grid of painted/unset cells and the editor tool state
//! - Validate canvas resize requests
//! - Export the canvas as an RGBA buffer or PNG
//! - Replay recorded editing sessions

pub mod cli;
pub mod color;
pub mod config;
pub mod editor;
pub mod export;
pub mod grid;
pub mod logging;
pub mod named_colors;
pub mod output;
pub mod resize;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;
