//! Line-oriented input script.
//!
//! Stands in for a windowing system: each line of input is one event for the
//! interactive loop. Grammar, one command per line:
//!
//! ```text
//! key <+|-|left|right|up|down>
//! wheel <eighths-of-a-degree>
//! down <x> <y> [primary|middle|secondary]
//! move <x> <y>
//! up <x> <y> [primary|middle|secondary]
//! pan <dx> <dy> <started|updated|finished|canceled>
//! pinch <factor> <started|updated|finished|canceled>
//! resize <width> <height>
//! present
//! wait
//! quit
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use viewport::input::{Button, GesturePhase, Key};
use viewport::view::{ScreenPos, ViewportSize};

/// One input event for the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Raw wheel delta in eighths of a degree.
    Wheel(i32),
    PointerDown(ScreenPos, Button),
    PointerMove(ScreenPos),
    PointerUp(ScreenPos, Button),
    Pan { dx: f64, dy: f64, phase: GesturePhase },
    Pinch { factor: f64, phase: GesturePhase },
    Resize(ViewportSize),
    /// Emit a presentation report now.
    Present,
    /// Hold further input until the newest render has been delivered.
    Wait,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command}: missing {what}")]
    Missing { command: &'static str, what: &'static str },
    #[error("{command}: invalid {what} {value:?}")]
    Invalid { command: &'static str, what: &'static str, value: String },
    #[error("{command}: unexpected trailing input {rest:?}")]
    Trailing { command: &'static str, rest: String },
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Returns [`ScriptError`] for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let mut args = Args { words, command: "" };

    let event = match name.to_ascii_lowercase().as_str() {
        "key" => {
            args.command = "key";
            let value = args.word("key name")?;
            InputEvent::Key(parse_key(value).ok_or_else(|| args.invalid("key name", value))?)
        }
        "wheel" => {
            args.command = "wheel";
            InputEvent::Wheel(args.number("delta")?)
        }
        "down" => {
            args.command = "down";
            let pos = args.pos()?;
            InputEvent::PointerDown(pos, args.button()?)
        }
        "move" => {
            args.command = "move";
            InputEvent::PointerMove(args.pos()?)
        }
        "up" => {
            args.command = "up";
            let pos = args.pos()?;
            InputEvent::PointerUp(pos, args.button()?)
        }
        "pan" => {
            args.command = "pan";
            let dx = args.number("dx")?;
            let dy = args.number("dy")?;
            InputEvent::Pan { dx, dy, phase: args.phase()? }
        }
        "pinch" => {
            args.command = "pinch";
            let factor = args.number("factor")?;
            InputEvent::Pinch { factor, phase: args.phase()? }
        }
        "resize" => {
            args.command = "resize";
            let width = args.number("width")?;
            let height = args.number("height")?;
            InputEvent::Resize(ViewportSize::new(width, height))
        }
        "present" => {
            args.command = "present";
            InputEvent::Present
        }
        "wait" => {
            args.command = "wait";
            InputEvent::Wait
        }
        "quit" | "exit" => {
            args.command = "quit";
            InputEvent::Quit
        }
        _ => return Err(ScriptError::UnknownCommand(name.to_owned())),
    };

    args.finish()?;
    Ok(Some(event))
}

/// Read script lines from `reader` and forward parsed events to `tx`.
///
/// Malformed lines are logged and skipped. Returns when the input ends, a
/// read fails, or the receiver is gone; dropping `tx` then tells the
/// session that input is over.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<InputEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut line_no: usize = 0;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "input read failed");
                break;
            }
        };
        line_no += 1;

        match parse_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    debug!(line_no, "session gone; stopping input reader");
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(line_no, error = %e, "skipping malformed input line"),
        }
    }
    debug!(lines = line_no, "input exhausted");
}

fn parse_key(value: &str) -> Option<Key> {
    let key = match value.to_ascii_lowercase().as_str() {
        "+" | "plus" | "zoom-in" => Key::ZoomIn,
        "-" | "minus" | "zoom-out" => Key::ZoomOut,
        "left" => Key::Left,
        "right" => Key::Right,
        "up" => Key::Up,
        "down" => Key::Down,
        _ => return None,
    };
    Some(key)
}

fn parse_button(value: &str) -> Option<Button> {
    let button = match value.to_ascii_lowercase().as_str() {
        "primary" | "left" => Button::Primary,
        "middle" => Button::Middle,
        "secondary" | "right" => Button::Secondary,
        _ => return None,
    };
    Some(button)
}

fn parse_phase(value: &str) -> Option<GesturePhase> {
    let phase = match value.to_ascii_lowercase().as_str() {
        "started" | "start" => GesturePhase::Started,
        "updated" | "update" => GesturePhase::Updated,
        "finished" | "finish" | "end" => GesturePhase::Finished,
        "canceled" | "cancelled" | "cancel" => GesturePhase::Canceled,
        _ => return None,
    };
    Some(phase)
}

/// Cursor over the arguments of one command.
struct Args<'a> {
    words: std::str::SplitWhitespace<'a>,
    command: &'static str,
}

impl<'a> Args<'a> {
    fn word(&mut self, what: &'static str) -> Result<&'a str, ScriptError> {
        self.words.next().ok_or(ScriptError::Missing { command: self.command, what })
    }

    fn number<T: FromStr>(&mut self, what: &'static str) -> Result<T, ScriptError> {
        let value = self.word(what)?;
        value.parse().map_err(|_| self.invalid(what, value))
    }

    fn pos(&mut self) -> Result<ScreenPos, ScriptError> {
        let x = self.number("x")?;
        let y = self.number("y")?;
        Ok(ScreenPos::new(x, y))
    }

    /// Optional trailing button name; primary when absent.
    fn button(&mut self) -> Result<Button, ScriptError> {
        match self.words.next() {
            None => Ok(Button::Primary),
            Some(value) => parse_button(value).ok_or_else(|| self.invalid("button", value)),
        }
    }

    fn phase(&mut self) -> Result<GesturePhase, ScriptError> {
        let value = self.word("phase")?;
        parse_phase(value).ok_or_else(|| self.invalid("phase", value))
    }

    fn invalid(&self, what: &'static str, value: &str) -> ScriptError {
        ScriptError::Invalid { command: self.command, what, value: value.to_owned() }
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        let rest: Vec<&str> = self.words.by_ref().collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(ScriptError::Trailing { command: self.command, rest: rest.join(" ") })
        }
    }
}
