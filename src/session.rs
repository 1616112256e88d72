//! Recorded editing sessions.
//!
//! A session is a stream of UI events, one JSON5 object each, tagged by `op`:
//!
//! ```text
//! {"op": "color", "value": "#ff0000"}
//! {"op": "toggle_outlines"}
//! {"op": "down"}
//! {"op": "move", "index": 4}
//! {"op": "up"}
//! {"op": "resize", "input": "10"}
//! ```
//!
//! Objects may span several lines; JSON5 comments and trailing commas are
//! allowed. Replaying a session drives an [`Editor`] exactly as the pointer and
//! dock events would.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::ColorError;
use crate::editor::Editor;
use crate::grid::GridError;
use crate::resize::ResizeError;

/// One UI event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Color picker changed
    Color { value: String },
    /// Eraser set on or off
    Eraser { enabled: bool },
    /// Eraser dock button pressed
    ToggleEraser,
    /// Cell outlines set on or off
    Outlines { enabled: bool },
    /// Outlines dock button pressed
    ToggleOutlines,
    /// Apply the current tool to a cell
    Paint { index: i64 },
    /// Unset a cell
    Erase { index: i64 },
    /// Pointer pressed over the canvas
    Down,
    /// Pointer moved over a cell
    Move { index: i64 },
    /// Pointer released
    Up,
    /// Cell clicked
    Click { index: i64 },
    /// Clear dock button pressed
    Clear,
    /// Resize prompt answered; `null` or missing means it was dismissed
    Resize {
        #[serde(default)]
        input: Option<String>,
    },
}

/// An event together with the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEvent {
    pub line: usize,
    pub event: SessionEvent,
}

/// A warning message from parsing or replaying a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Result of parsing a session stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub events: Vec<LineEvent>,
    pub warnings: Vec<Warning>,
}

/// Error type for an event the editor refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Resize(#[from] ResizeError),
}

/// Parse a single JSON5 string into a SessionEvent.
pub fn parse_line(line: &str, line_number: usize) -> Result<SessionEvent, ParseError> {
    json5::from_str(line).map_err(|e| ParseError { message: e.to_string(), line: line_number })
}

/// Parse a stream of JSON5 objects into session events.
///
/// Records may share a line or span several. `//` and `/* */` comments
/// between and inside records are skipped. Collects a warning for the first
/// malformed object and stops there, since the next object boundary cannot be
/// found reliably.
pub fn parse_stream<R: Read>(reader: R) -> ParseResult {
    use std::io::BufRead;

    let mut result = ParseResult::default();
    let buf_reader = std::io::BufReader::new(reader);
    let mut splitter = RecordSplitter::default();

    for (idx, line) in buf_reader.lines().map_while(Result::ok).enumerate() {
        for (start_line, record) in splitter.feed(&line, idx + 1) {
            match parse_line(&record, start_line) {
                Ok(event) => result.events.push(LineEvent { line: start_line, event }),
                Err(e) => {
                    result.warnings.push(Warning { message: e.message, line: e.line });
                    return result;
                }
            }
        }
    }

    if let Some((start_line, record)) = splitter.finish() {
        match parse_line(&record, start_line) {
            Ok(event) => result.events.push(LineEvent { line: start_line, event }),
            Err(e) => result.warnings.push(Warning { message: e.message, line: e.line }),
        }
    }

    result
}

/// Cuts a character stream into top-level `{...}` records.
#[derive(Debug, Default)]
struct RecordSplitter {
    record: String,
    start_line: usize,
    depth: i32,
    quote: Option<char>,
    escape_next: bool,
    in_block_comment: bool,
}

impl RecordSplitter {
    /// Feed one line, returning every record that closed on it with the line
    /// the record started on.
    fn feed(&mut self, line: &str, line_number: usize) -> Vec<(usize, String)> {
        let mut complete = Vec::new();
        let mut chars = line.chars().peekable();

        // a backslash at end of line escapes the newline itself
        self.escape_next = false;
        if !self.record.is_empty() {
            self.record.push('\n');
        }

        while let Some(ch) = chars.next() {
            if self.in_block_comment {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }

            if let Some(quote) = self.quote {
                self.record.push(ch);
                if self.escape_next {
                    self.escape_next = false;
                } else if ch == '\\' {
                    self.escape_next = true;
                } else if ch == quote {
                    self.quote = None;
                }
                continue;
            }

            match (ch, chars.peek()) {
                ('/', Some('/')) => break,
                ('/', Some('*')) => {
                    chars.next();
                    self.in_block_comment = true;
                    continue;
                }
                (c, _) if c.is_whitespace() && self.record.is_empty() => continue,
                _ => {}
            }

            if self.record.is_empty() {
                self.start_line = line_number;
            }
            self.record.push(ch);

            match ch {
                '"' | '\'' => self.quote = Some(ch),
                '{' => self.depth += 1,
                '}' => {
                    self.depth -= 1;
                    if self.depth <= 0 {
                        self.depth = 0;
                        complete.push((self.start_line, std::mem::take(&mut self.record)));
                    }
                }
                _ => {}
            }
        }

        complete
    }

    /// Whatever is left once the stream ends.
    fn finish(self) -> Option<(usize, String)> {
        if self.record.trim().is_empty() {
            None
        } else {
            Some((self.start_line, self.record))
        }
    }
}

/// Apply one event to the editor.
pub fn apply(editor: &mut Editor, event: &SessionEvent) -> Result<(), SessionError> {
    match event {
        SessionEvent::Color { value } => {
            editor.set_active_color_text(value)?;
        }
        SessionEvent::Eraser { enabled } => editor.set_erase_mode(*enabled),
        SessionEvent::ToggleEraser => {
            editor.toggle_erase_mode();
        }
        SessionEvent::Outlines { enabled } => editor.set_show_outlines(*enabled),
        SessionEvent::ToggleOutlines => {
            editor.toggle_outlines();
        }
        SessionEvent::Paint { index } => editor.paint(*index)?,
        SessionEvent::Erase { index } => editor.erase(*index)?,
        SessionEvent::Down => editor.start_drawing(),
        SessionEvent::Move { index } => {
            editor.pointer_move(*index)?;
        }
        SessionEvent::Up => editor.stop_drawing(),
        SessionEvent::Click { index } => {
            editor.click(*index)?;
        }
        SessionEvent::Clear => editor.clear(),
        SessionEvent::Resize { input } => {
            editor.request_resize(input.as_deref())?;
        }
    }
    Ok(())
}

/// Replay events in order. A refused event becomes a warning and replay goes on.
pub fn replay(editor: &mut Editor, events: &[LineEvent]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for LineEvent { line, event } in events {
        if let Err(e) = apply(editor, event) {
            log::warn!("line {}: {}", line, e);
            warnings.push(Warning { message: e.to_string(), line: *line });
        }
    }
    warnings
}

/// Serialize events as JSONL, one compact object per line.
pub fn to_jsonl(events: &[SessionEvent]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}
