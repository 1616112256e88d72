//! WASM API module for browser/JS interop
//!
//! Exposes the editor to a page that renders the cells and forwards pointer
//! and dock-button events.

use wasm_bindgen::prelude::*;

use crate::color::{parse_color, to_hex};
use crate::editor::{Editor, EditorSettings};
use crate::grid::GridLimits;
use crate::output::encode_png;
use crate::resize::{invalid_input_message, prompt_message};
use crate::session::{to_jsonl, SessionEvent};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// A canvas plus its tool state, owned by the page.
///
/// Every state-changing call is also recorded so the page can offer the
/// session for download and replay it later with `sketch replay`.
#[wasm_bindgen]
pub struct Sketchpad {
    editor: Editor,
    recorded: Vec<SessionEvent>,
}

#[wasm_bindgen]
impl Sketchpad {
    /// Create a sketchpad with side length `resolution` and the default limits.
    #[wasm_bindgen(constructor)]
    pub fn new(resolution: u32) -> Result<Sketchpad, JsError> {
        let settings = EditorSettings { resolution, ..EditorSettings::default() };
        let editor = Editor::new(settings).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Sketchpad { editor, recorded: Vec::new() })
    }

    #[wasm_bindgen(getter)]
    pub fn resolution(&self) -> u32 {
        self.editor.resolution()
    }

    #[wasm_bindgen(getter, js_name = maxResolution)]
    pub fn max_resolution(&self) -> u32 {
        self.editor.limits().max_resolution
    }

    #[wasm_bindgen(getter, js_name = eraseMode)]
    pub fn erase_mode(&self) -> bool {
        self.editor.erase_mode()
    }

    #[wasm_bindgen(getter)]
    pub fn drawing(&self) -> bool {
        self.editor.is_drawing()
    }

    /// Apply the current tool to a cell. Returns false for an invalid index.
    pub fn paint(&mut self, index: i32) -> bool {
        let ok = self.editor.paint(index.into()).is_ok();
        self.record_if(ok, SessionEvent::Paint { index: index.into() });
        ok
    }

    pub fn erase(&mut self, index: i32) -> bool {
        let ok = self.editor.erase(index.into()).is_ok();
        self.record_if(ok, SessionEvent::Erase { index: index.into() });
        ok
    }

    /// Cell clicked. Returns whether a cell was touched.
    pub fn click(&mut self, index: i32) -> bool {
        let touched = self.editor.click(index.into()).unwrap_or(false);
        self.record_if(touched, SessionEvent::Click { index: index.into() });
        touched
    }

    /// Pointer moved over a cell. Returns whether a cell was touched.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, index: i32) -> bool {
        let touched = self.editor.pointer_move(index.into()).unwrap_or(false);
        self.record_if(touched, SessionEvent::Move { index: index.into() });
        touched
    }

    #[wasm_bindgen(js_name = startDrawing)]
    pub fn start_drawing(&mut self) {
        self.editor.start_drawing();
        self.recorded.push(SessionEvent::Down);
    }

    #[wasm_bindgen(js_name = stopDrawing)]
    pub fn stop_drawing(&mut self) {
        self.editor.stop_drawing();
        self.recorded.push(SessionEvent::Up);
    }

    /// Set the paint color from CSS text. Returns false (keeping the old color)
    /// if the text is not a color.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, text: &str) -> bool {
        let ok = self.editor.set_active_color_text(text).is_ok();
        self.record_if(ok, SessionEvent::Color { value: text.to_string() });
        ok
    }

    /// Current paint color as `#rrggbbaa`.
    #[wasm_bindgen(getter, js_name = activeColor)]
    pub fn active_color(&self) -> String {
        to_hex(self.editor.active_color())
    }

    #[wasm_bindgen(js_name = setEraseMode)]
    pub fn set_erase_mode(&mut self, enabled: bool) {
        self.editor.set_erase_mode(enabled);
        self.recorded.push(SessionEvent::Eraser { enabled });
    }

    #[wasm_bindgen(js_name = toggleEraseMode)]
    pub fn toggle_erase_mode(&mut self) -> bool {
        self.recorded.push(SessionEvent::ToggleEraser);
        self.editor.toggle_erase_mode()
    }

    pub fn clear(&mut self) {
        self.editor.clear();
        self.recorded.push(SessionEvent::Clear);
    }

    #[wasm_bindgen(getter, js_name = showOutlines)]
    pub fn show_outlines(&self) -> bool {
        self.editor.show_outlines()
    }

    #[wasm_bindgen(js_name = setShowOutlines)]
    pub fn set_show_outlines(&mut self, enabled: bool) {
        self.editor.set_show_outlines(enabled);
        self.recorded.push(SessionEvent::Outlines { enabled });
    }

    #[wasm_bindgen(js_name = toggleOutlines)]
    pub fn toggle_outlines(&mut self) -> bool {
        self.recorded.push(SessionEvent::ToggleOutlines);
        self.editor.toggle_outlines()
    }

    /// Text for the resize prompt.
    #[wasm_bindgen(js_name = resizePrompt)]
    pub fn resize_prompt(&self) -> String {
        prompt_message(self.editor.limits().max_resolution)
    }

    /// Answer to the resize prompt (`null` if dismissed).
    ///
    /// Returns an empty string when the canvas was resized or the prompt was
    /// cancelled, otherwise the message to show the user.
    pub fn resize(&mut self, input: Option<String>) -> String {
        match self.editor.request_resize(input.as_deref()) {
            Ok(resized) => {
                if resized {
                    self.recorded.push(SessionEvent::Resize { input });
                }
                String::new()
            }
            Err(_) => invalid_input_message(self.editor.limits().max_resolution),
        }
    }

    /// Fill color of a cell as `#rrggbbaa`, or an empty string for an invalid index.
    #[wasm_bindgen(js_name = cellColor)]
    pub fn cell_color(&self, index: i32) -> String {
        self.editor.resolve(index.into()).map(to_hex).unwrap_or_default()
    }

    /// Raw RGBA pixel data (4 bytes per cell, row-major)
    #[wasm_bindgen(js_name = exportRgba)]
    pub fn export_rgba(&self) -> Vec<u8> {
        self.editor.export_raster()
    }

    /// PNG image data, or an empty array if encoding failed
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self, scale: u8) -> Vec<u8> {
        encode_png(self.editor.grid(), scale.max(1)).unwrap_or_default()
    }

    /// Everything done so far as a replayable JSONL session.
    #[wasm_bindgen(js_name = sessionLog)]
    pub fn session_log(&self) -> String {
        to_jsonl(&self.recorded).unwrap_or_default()
    }

    fn record_if(&mut self, ok: bool, event: SessionEvent) {
        if ok {
            self.recorded.push(event);
        }
    }
}

/// Parse a CSS color string to `[r, g, b, a]`, or an empty array if invalid.
#[wasm_bindgen(js_name = parseColor)]
pub fn parse_color_rgba(text: &str) -> Vec<u8> {
    parse_color(text).map(|c| c.0.to_vec()).unwrap_or_default()
}

/// Default resize bounds, for pages that build their own prompt.
#[wasm_bindgen(js_name = defaultMaxResolution)]
pub fn default_max_resolution() -> u32 {
    GridLimits::default().max_resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::parse_stream;
    use std::io::Cursor;

    fn pad() -> Sketchpad {
        match Sketchpad::new(4) {
            Ok(p) => p,
            Err(_) => panic!("4 is a valid resolution"),
        }
    }

    #[test]
    fn test_new_and_getters() {
        let p = pad();
        assert_eq!(p.resolution(), 4);
        assert_eq!(p.max_resolution(), 64);
        assert!(!p.erase_mode());
        assert!(!p.drawing());
        assert_eq!(p.active_color(), "#000000ff");
    }

    #[test]
    fn test_paint_and_cell_color() {
        let mut p = pad();
        assert!(p.set_color("tomato"));
        assert!(p.paint(5));
        assert_eq!(p.cell_color(5), "#ff6347ff");
        assert_eq!(p.cell_color(0), "#00000000");
        assert!(!p.paint(16));
        assert!(!p.paint(-1));
        assert_eq!(p.cell_color(16), "");
    }

    #[test]
    fn test_outlines_toggle_is_recorded() {
        let mut p = pad();
        assert!(p.toggle_outlines());
        assert!(p.show_outlines());
        p.set_show_outlines(false);
        assert!(!p.show_outlines());
        assert_eq!(
            p.session_log(),
            "{\"op\":\"toggle_outlines\"}\n{\"op\":\"outlines\",\"enabled\":false}\n"
        );
    }

    #[test]
    fn test_bad_color_keeps_previous() {
        let mut p = pad();
        assert!(p.set_color("#0f0"));
        assert!(!p.set_color("nope"));
        assert_eq!(p.active_color(), "#00ff00ff");
    }

    #[test]
    fn test_drawing_session() {
        let mut p = pad();
        assert!(!p.pointer_move(1));
        p.start_drawing();
        assert!(p.pointer_move(1));
        p.stop_drawing();
        assert!(!p.pointer_move(2));
        assert!(p.click(2));
        assert_eq!(p.cell_color(1), "#000000ff");
        assert_eq!(p.cell_color(2), "#000000ff");
    }

    #[test]
    fn test_resize_messages() {
        let mut p = pad();
        assert_eq!(p.resize(Some("8".to_string())), "");
        assert_eq!(p.resolution(), 8);
        assert_eq!(p.resize(None), "");
        assert_eq!(
            p.resize(Some("3.5".to_string())),
            "Invalid input. Integers in the range 1-64 inclusive only, please."
        );
        assert_eq!(p.resolution(), 8);
        assert!(p.resize_prompt().contains("(1-64)"));
    }

    #[test]
    fn test_export_rgba_and_png() {
        let mut p = pad();
        p.set_color("#ff0000");
        p.paint(0);
        let rgba = p.export_rgba();
        assert_eq!(rgba.len(), 64);
        assert_eq!(&rgba[0..4], &[255, 0, 0, 255]);

        let png = p.export_png(2);
        assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_session_log_replays_to_same_canvas() {
        let mut p = pad();
        p.set_color("navy");
        p.click(3);
        p.toggle_erase_mode();
        p.start_drawing();
        p.pointer_move(3);
        p.stop_drawing();
        p.set_erase_mode(false);
        p.resize(Some("2".to_string()));
        p.paint(1);

        let parsed = parse_stream(Cursor::new(p.session_log()));
        assert!(parsed.warnings.is_empty());

        let settings = EditorSettings { resolution: 4, ..Default::default() };
        let mut replayed = Editor::new(settings).unwrap();
        let warnings = crate::session::replay(&mut replayed, &parsed.events);
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(replayed.export_raster(), p.export_rgba());
    }

    #[test]
    fn test_parse_color_rgba() {
        assert_eq!(parse_color_rgba("rgba(0,128,255,0.5)"), vec![0, 128, 255, 128]);
        assert!(parse_color_rgba("bogus").is_empty());
    }
}
