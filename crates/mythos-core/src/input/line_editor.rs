//! Single-line cooked input

use super::{ClearRegion, Key, Terminal};
use crate::error::Result;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// How typed characters are echoed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    Plain,
    /// One glyph per character
    Masked(char),
    /// Nothing is echoed
    Hidden,
}

/// Outcome of a read: a value, or the user pressed Escape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Submitted(T),
    Cancelled,
}

impl<T> ReadOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReadOutcome::Cancelled)
    }
}

type Validator<'a> = Box<dyn Fn(&str) -> Option<String> + Send + Sync + 'a>;

/// Reads one line with backspace and Escape handling.
///
/// A validator returning a non-empty message rejects the line: the message
/// is shown and the read restarts from an empty buffer.
pub struct LineEditor<'a> {
    prompt: String,
    echo: Echo,
    default: Option<String>,
    validate: Option<Validator<'a>>,
}

impl<'a> LineEditor<'a> {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            echo: Echo::Plain,
            default: None,
            validate: None,
        }
    }

    pub fn echo(mut self, echo: Echo) -> Self {
        self.echo = echo;
        self
    }

    /// Value submitted when Enter is pressed on an empty buffer
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validate(mut self, validate: impl Fn(&str) -> Option<String> + Send + Sync + 'a) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub async fn read<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<ReadOutcome<String>> {
        self.read_with(term, |line| line).await
    }

    /// Read a line and apply `transform` to a clean submission
    pub async fn read_with<T, R>(
        &self,
        term: &mut T,
        transform: impl FnOnce(String) -> R,
    ) -> Result<ReadOutcome<R>>
    where
        T: Terminal + ?Sized,
    {
        loop {
            term.write(&self.prompt)?;

            let line = match self.read_buffer(term).await? {
                Some(line) => line,
                None => {
                    term.clear(ClearRegion::Line)?;
                    debug!("Line input cancelled");
                    return Ok(ReadOutcome::Cancelled);
                }
            };
            term.write("\n")?;

            let value = match (&self.default, line.is_empty()) {
                (Some(default), true) => default.clone(),
                _ => line,
            };

            if let Some(validate) = &self.validate {
                if let Some(message) = validate(&value).filter(|m| !m.is_empty()) {
                    term.write(&message)?;
                    term.write("\n")?;
                    continue;
                }
            }

            return Ok(ReadOutcome::Submitted(transform(value)));
        }
    }

    /// Collect keys until Enter (`Some`) or Escape (`None`)
    async fn read_buffer<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<Option<String>> {
        let mut buffer = String::new();
        loop {
            match term.read_key().await? {
                Key::Enter => return Ok(Some(buffer)),
                Key::Escape => return Ok(None),
                Key::Backspace => {
                    if let Some((idx, _)) = buffer.grapheme_indices(true).next_back() {
                        buffer.truncate(idx);
                        if self.echo != Echo::Hidden {
                            term.write("\x08 \x08")?;
                        }
                    }
                }
                Key::Char(c) if !c.is_control() => {
                    buffer.push(c);
                    match self.echo {
                        Echo::Plain => term.write(c.encode_utf8(&mut [0u8; 4]))?,
                        Echo::Masked(glyph) => term.write(glyph.encode_utf8(&mut [0u8; 4]))?,
                        Echo::Hidden => {}
                    }
                }
                _ => {}
            }
        }
    }
}
