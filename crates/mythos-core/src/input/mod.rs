//! Keyboard input and display adapter
//!
//! This module provides:
//! - The `Terminal` trait every front end implements (write text, read one
//!   key, clear a region)
//! - `LineEditor`, the single cooked-input primitive used for credentials
//!   and shell commands alike
//! - The screen header drawn after every full clear

mod line_editor;

pub use line_editor::{Echo, LineEditor, ReadOutcome};

use crate::error::Result;
use async_trait::async_trait;

/// A decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
    Up,
    Down,
    /// Anything the shell does not react to
    Other,
}

/// Text style a front end may render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Selected picker row
    Highlight,
    /// Directory names in listings
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearRegion {
    Screen,
    Line,
}

/// Display adapter.
///
/// Text passed to `write` uses `\n` line endings; adapters running in raw
/// mode translate them. `read_key` is the only suspension point of a
/// session.
#[async_trait]
pub trait Terminal: Send {
    /// Block until the next key press
    async fn read_key(&mut self) -> Result<Key>;

    fn write(&mut self, text: &str) -> Result<()>;

    fn write_styled(&mut self, text: &str, _style: Style) -> Result<()> {
        self.write(text)
    }

    fn clear(&mut self, region: ClearRegion) -> Result<()>;

    fn width(&self) -> u16 {
        80
    }

    /// Hand the terminal to a child process
    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }

    /// Take the terminal back after `suspend`
    fn resume(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Clear the screen and draw the ` MythOS v{version} ` bar
pub fn clear_screen<T: Terminal + ?Sized>(term: &mut T, version: &str) -> Result<()> {
    term.clear(ClearRegion::Screen)?;
    let header = header_bar(version, term.width() as usize);
    term.write(&header)?;
    term.write("\n\n")
}

fn header_bar(version: &str, width: usize) -> String {
    let title = format!(" MythOS v{} ", version);
    let len = title.chars().count();
    if len >= width {
        return title;
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", "=".repeat(left), title, "=".repeat(right))
}
