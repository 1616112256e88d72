//! Editor state: the canvas plus the tool settings that drive painting.
//!
//! The UI layer owns one [`Editor`] and talks to it only through these
//! methods. Pointer handling maps onto these calls:
//!
//! - pointer down over a cell: [`Editor::start_drawing`]
//! - pointer up anywhere: [`Editor::stop_drawing`]
//! - pointer moving over a cell: [`Editor::pointer_move`] (paints only while drawing)
//! - click on a cell: [`Editor::click`] (always paints)

use image::Rgba;

use crate::color::{parse_color, ColorError};
use crate::export::export_raster;
use crate::grid::{Grid, GridError, GridLimits, PaintState, DEFAULT_RESOLUTION};
use crate::resize::{request_resize, ResizeError, ResizeOutcome};

/// Initial values for a new editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    pub limits: GridLimits,
    pub resolution: u32,
    pub color: Rgba<u8>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            limits: GridLimits::default(),
            resolution: DEFAULT_RESOLUTION,
            color: Rgba([0, 0, 0, 255]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    grid: Grid,
    limits: GridLimits,
    active_color: Rgba<u8>,
    erase_mode: bool,
    show_outlines: bool,
    drawing: bool,
}

impl Editor {
    /// Create an editor with a blank canvas.
    pub fn new(settings: EditorSettings) -> Result<Self, GridError> {
        let grid = Grid::new(settings.resolution, settings.limits)?;
        Ok(Self {
            grid,
            limits: settings.limits,
            active_color: settings.color,
            erase_mode: false,
            show_outlines: false,
            drawing: false,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn resolution(&self) -> u32 {
        self.grid.resolution()
    }

    pub fn limits(&self) -> GridLimits {
        self.limits
    }

    pub fn active_color(&self) -> Rgba<u8> {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: Rgba<u8>) {
        self.active_color = color;
    }

    /// Parse and set the active color. On error the previous color is kept.
    pub fn set_active_color_text(&mut self, text: &str) -> Result<Rgba<u8>, ColorError> {
        let color = parse_color(text)?;
        self.active_color = color;
        Ok(color)
    }

    pub fn erase_mode(&self) -> bool {
        self.erase_mode
    }

    pub fn set_erase_mode(&mut self, enabled: bool) {
        self.erase_mode = enabled;
    }

    /// Flip erase mode, returning the new setting.
    pub fn toggle_erase_mode(&mut self) -> bool {
        self.erase_mode = !self.erase_mode;
        self.erase_mode
    }

    /// Whether the UI should draw cell outlines. Display only; export ignores it.
    pub fn show_outlines(&self) -> bool {
        self.show_outlines
    }

    pub fn set_show_outlines(&mut self, enabled: bool) {
        self.show_outlines = enabled;
    }

    /// Flip cell outlines, returning the new setting.
    pub fn toggle_outlines(&mut self) -> bool {
        self.show_outlines = !self.show_outlines;
        self.show_outlines
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn start_drawing(&mut self) {
        self.drawing = true;
    }

    pub fn stop_drawing(&mut self) {
        self.drawing = false;
    }

    /// Apply the current tool to `index`: the active color, or unset in erase mode.
    pub fn paint(&mut self, index: i64) -> Result<(), GridError> {
        let i = self.grid.checked_index(index)?;
        if self.erase_mode {
            self.grid.erase(i)
        } else {
            self.grid.paint(i, self.active_color)
        }
    }

    /// Reset `index` to unset regardless of erase mode.
    pub fn erase(&mut self, index: i64) -> Result<(), GridError> {
        let i = self.grid.checked_index(index)?;
        self.grid.erase(i)
    }

    /// Pointer moved over `index`. Returns whether the cell was touched.
    pub fn pointer_move(&mut self, index: i64) -> Result<bool, GridError> {
        if !self.drawing {
            return Ok(false);
        }
        self.paint(index)?;
        Ok(true)
    }

    /// Cell at `index` was clicked. Clicks paint even outside a drawing session.
    pub fn click(&mut self, index: i64) -> Result<bool, GridError> {
        self.paint(index)?;
        Ok(true)
    }

    /// Unset every cell, keeping the resolution and tool settings.
    pub fn clear(&mut self) {
        log::debug!("clearing {0}x{0} canvas", self.grid.resolution());
        self.grid.clear();
    }

    /// Handle a resize prompt answer (`None` if the prompt was dismissed).
    ///
    /// A valid answer replaces the canvas with a blank one; an invalid answer
    /// leaves everything unchanged. Returns whether the canvas was replaced.
    pub fn request_resize(&mut self, input: Option<&str>) -> Result<bool, ResizeError> {
        match request_resize(&self.grid, input, self.limits) {
            Ok(ResizeOutcome::Resized(grid)) => {
                self.grid = grid;
                self.drawing = false;
                Ok(true)
            }
            Ok(ResizeOutcome::Cancelled) => Ok(false),
            Err(e) => {
                log::warn!("resize rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn state(&self, index: i64) -> Result<PaintState, GridError> {
        let i = self.grid.checked_index(index)?;
        self.grid.state(i)
    }

    /// Effective color of `index`, for rendering the cell.
    pub fn resolve(&self, index: i64) -> Result<Rgba<u8>, GridError> {
        let i = self.grid.checked_index(index)?;
        self.grid.resolve(i)
    }

    /// RGBA8 pixel buffer of the whole canvas, row-major.
    pub fn export_raster(&self) -> Vec<u8> {
        export_raster(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TRANSPARENT;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn editor() -> Editor {
        Editor::new(EditorSettings::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let e = editor();
        assert_eq!(e.resolution(), 22);
        assert_eq!(e.grid().len(), 484);
        assert_eq!(e.active_color(), Rgba([0, 0, 0, 255]));
        assert!(!e.erase_mode());
        assert!(!e.is_drawing());
    }

    #[test]
    fn test_invalid_default_resolution() {
        let settings = EditorSettings { resolution: 100, ..EditorSettings::default() };
        assert!(Editor::new(settings).is_err());
    }

    #[test]
    fn test_paint_uses_active_color() {
        let mut e = editor();
        e.set_active_color(RED);
        e.paint(5).unwrap();
        assert_eq!(e.resolve(5).unwrap(), RED);
    }

    #[test]
    fn test_paint_in_erase_mode_unsets() {
        let mut e = editor();
        e.set_active_color(RED);
        e.paint(5).unwrap();
        e.set_erase_mode(true);
        e.paint(5).unwrap();
        assert_eq!(e.state(5).unwrap(), PaintState::Unset);
    }

    #[test]
    fn test_toggle_erase_mode() {
        let mut e = editor();
        assert!(e.toggle_erase_mode());
        assert!(!e.toggle_erase_mode());
    }

    #[test]
    fn test_outlines_survive_resize_and_clear() {
        let mut e = editor();
        assert!(!e.show_outlines());
        assert!(e.toggle_outlines());
        e.paint(0).unwrap();
        let with_outlines = e.export_raster();
        e.set_show_outlines(false);
        assert_eq!(e.export_raster(), with_outlines);

        e.set_show_outlines(true);
        e.clear();
        assert!(e.request_resize(Some("5")).unwrap());
        assert!(e.show_outlines());
        assert!(!e.toggle_outlines());
    }

    #[test]
    fn test_bad_color_text_keeps_previous() {
        let mut e = editor();
        e.set_active_color(RED);
        assert!(e.set_active_color_text("not-a-color").is_err());
        assert_eq!(e.active_color(), RED);
        assert_eq!(e.set_active_color_text("#00f").unwrap(), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_move_only_paints_while_drawing() {
        let mut e = editor();
        e.set_active_color(RED);
        assert!(!e.pointer_move(1).unwrap());
        assert_eq!(e.resolve(1).unwrap(), TRANSPARENT);

        e.start_drawing();
        assert!(e.pointer_move(1).unwrap());
        assert_eq!(e.resolve(1).unwrap(), RED);

        e.stop_drawing();
        assert!(!e.pointer_move(2).unwrap());
        assert_eq!(e.resolve(2).unwrap(), TRANSPARENT);
    }

    #[test]
    fn test_click_always_paints() {
        let mut e = editor();
        e.set_active_color(RED);
        assert!(e.click(3).unwrap());
        assert_eq!(e.resolve(3).unwrap(), RED);
    }

    #[test]
    fn test_out_of_range_indices() {
        let mut e = editor();
        let n = e.grid().len() as i64;
        assert!(matches!(e.paint(n), Err(GridError::IndexOutOfRange { .. })));
        assert!(matches!(e.paint(-1), Err(GridError::IndexOutOfRange { .. })));
        assert!(e.erase(n).is_err());
        assert!(e.resolve(-5).is_err());
        assert!(e.paint(n - 1).is_ok());
    }

    #[test]
    fn test_rejected_resize_keeps_canvas() {
        let mut e = editor();
        e.set_active_color(RED);
        e.paint(0).unwrap();
        for bad in ["0", "65", "3.5", "abc"] {
            assert!(e.request_resize(Some(bad)).is_err(), "{} should be rejected", bad);
            assert_eq!(e.resolution(), 22);
            assert_eq!(e.resolve(0).unwrap(), RED);
        }
    }

    #[test]
    fn test_resize_replaces_canvas_and_keeps_tools() {
        let mut e = editor();
        e.set_active_color(RED);
        e.set_erase_mode(true);
        e.start_drawing();
        assert!(e.request_resize(Some("10")).unwrap());
        assert_eq!(e.resolution(), 10);
        assert_eq!(e.grid().painted_count(), 0);
        assert_eq!(e.active_color(), RED);
        assert!(e.erase_mode());
        assert!(!e.is_drawing());
    }

    #[test]
    fn test_cancelled_resize() {
        let mut e = editor();
        e.paint(0).unwrap();
        assert!(!e.request_resize(None).unwrap());
        assert!(!e.request_resize(Some("")).unwrap());
        assert_eq!(e.grid().painted_count(), 1);
    }

    #[test]
    fn test_clear_keeps_resolution_and_color() {
        let mut e = editor();
        e.set_active_color(RED);
        e.paint(0).unwrap();
        e.clear();
        assert_eq!(e.resolution(), 22);
        assert_eq!(e.grid().painted_count(), 0);
        assert_eq!(e.active_color(), RED);
    }

    #[test]
    fn test_export_raster_size() {
        let mut e = editor();
        e.request_resize(Some("3")).unwrap();
        e.set_active_color(RED);
        e.paint(8).unwrap();
        let data = e.export_raster();
        assert_eq!(data.len(), 36);
        assert_eq!(&data[32..36], &[255, 0, 0, 255]);
    }
}
