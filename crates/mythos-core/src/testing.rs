//! Test harness for driving sessions without a real terminal.
//!
//! `ScriptedTerminal` replays a queue of keys and records everything
//! written, so account flows, the line editor and the shell loop can be
//! exercised deterministically.
//!
//! ```
//! use mythos_core::input::{LineEditor, ReadOutcome};
//! use mythos_core::testing::ScriptedTerminal;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut term = ScriptedTerminal::new();
//! term.type_line("ls");
//! let line = LineEditor::new("root % ").read(&mut term).await.unwrap();
//! assert_eq!(line, ReadOutcome::Submitted("ls".to_string()));
//! # });
//! ```

use crate::error::{Error, Result};
use crate::input::{ClearRegion, Key, Style, Terminal};
use async_trait::async_trait;
use std::collections::VecDeque;

/// In-memory `Terminal` fed from a key script
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    keys: VecDeque<Key>,
    output: String,
    screen_start: usize,
    clears: usize,
    styled: Vec<(String, Style)>,
    suspended: usize,
    width: u16,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self {
            width: 80,
            ..Self::default()
        }
    }

    pub fn push_key(&mut self, key: Key) -> &mut Self {
        self.keys.push_back(key);
        self
    }

    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = Key>) -> &mut Self {
        self.keys.extend(keys);
        self
    }

    /// Queue the characters of `text` without pressing Enter
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        self.keys.extend(text.chars().map(Key::Char));
        self
    }

    /// Queue the characters of `text` followed by Enter
    pub fn type_line(&mut self, text: &str) -> &mut Self {
        self.type_text(text);
        self.keys.push_back(Key::Enter);
        self
    }

    /// Keys not yet consumed
    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    /// Text still on screen: everything written since creation, minus lines
    /// erased with a line clear
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Everything written since the last full-screen clear
    pub fn screen(&self) -> &str {
        &self.output[self.screen_start..]
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Text written with a non-plain style, in order
    pub fn styled(&self) -> &[(String, Style)] {
        &self.styled
    }

    pub fn suspend_count(&self) -> usize {
        self.suspended
    }
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    async fn read_key(&mut self) -> Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| Error::Internal("key script exhausted".to_string()))
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: Style) -> Result<()> {
        if style != Style::Plain {
            self.styled.push((text.to_string(), style));
        }
        self.write(text)
    }

    fn clear(&mut self, region: ClearRegion) -> Result<()> {
        match region {
            ClearRegion::Screen => {
                self.clears += 1;
                self.screen_start = self.output.len();
            }
            ClearRegion::Line => {
                let line_start = self.output.rfind('\n').map_or(0, |i| i + 1);
                self.output.truncate(line_start.max(self.screen_start));
            }
        }
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn suspend(&mut self) -> Result<()> {
        self.suspended += 1;
        Ok(())
    }
}
