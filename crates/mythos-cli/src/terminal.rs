//! crossterm-backed display adapter

use async_trait::async_trait;
use crossterm::cursor::MoveTo;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use futures::StreamExt;
use mythos_core::error::{Error, Result};
use mythos_core::input::{ClearRegion, Key, Style, Terminal};
use std::io::{self, Stdout, Write};
use tracing::debug;

/// Raw-mode terminal on stdin/stdout
pub struct CrosstermTerminal {
    events: EventStream,
    stdout: Stdout,
    raw: bool,
}

impl CrosstermTerminal {
    /// Enter raw mode. Raw mode is left again on drop.
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        debug!("Raw mode enabled");
        Ok(Self {
            events: EventStream::new(),
            stdout: io::stdout(),
            raw: true,
        })
    }
}

/// Translate a key event; `None` for events the shell ignores
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    let key = match event.code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Char(_) if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Key::Other
        }
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    };
    Some(key)
}

fn is_interrupt(event: &KeyEvent) -> bool {
    event.kind == KeyEventKind::Press
        && event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

#[async_trait]
impl Terminal for CrosstermTerminal {
    async fn read_key(&mut self) -> Result<Key> {
        loop {
            match self.events.next().await {
                Some(Ok(Event::Key(event))) => {
                    if is_interrupt(&event) {
                        return Err(Error::Internal("interrupted".to_string()));
                    }
                    if let Some(key) = map_key(event) {
                        return Ok(key);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Err(Error::Internal("input stream closed".to_string())),
            }
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if self.raw {
            self.stdout.write_all(text.replace('\n', "\r\n").as_bytes())?;
        } else {
            self.stdout.write_all(text.as_bytes())?;
        }
        self.stdout.flush()?;
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: Style) -> Result<()> {
        match style {
            Style::Plain => return self.write(text),
            Style::Highlight => queue!(
                self.stdout,
                SetBackgroundColor(Color::White),
                SetForegroundColor(Color::Black)
            )?,
            Style::Directory => queue!(self.stdout, SetForegroundColor(Color::Cyan))?,
        }
        execute!(self.stdout, Print(text), ResetColor)?;
        Ok(())
    }

    fn clear(&mut self, region: ClearRegion) -> Result<()> {
        match region {
            ClearRegion::Screen => execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?,
            ClearRegion::Line => execute!(self.stdout, Clear(ClearType::CurrentLine), Print("\r"))?,
        }
        Ok(())
    }

    fn width(&self) -> u16 {
        terminal::size().map(|(w, _)| w).unwrap_or(80)
    }

    fn suspend(&mut self) -> Result<()> {
        if self.raw {
            terminal::disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if !self.raw {
            terminal::enable_raw_mode()?;
            self.raw = true;
        }
        Ok(())
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}
