//! Account picker

use super::AccountStore;
use crate::error::Result;
use crate::input::{clear_screen, Key, Style, Terminal};

/// One row of the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEntry {
    Account(usize),
    /// The trailing "create new account" row
    CreateNew,
}

impl PickerEntry {
    /// Index as stored on disk, `-1` for "create new"
    pub fn as_index(&self) -> i64 {
        match self {
            PickerEntry::Account(i) => *i as i64,
            PickerEntry::CreateNew => -1,
        }
    }
}

/// Cursor over `len` accounts plus the "create new" row, wrapping at both
/// ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    len: usize,
    cursor: PickerEntry,
}

impl Picker {
    pub fn new(len: usize, start: Option<PickerEntry>) -> Self {
        let cursor = match start {
            Some(PickerEntry::Account(i)) if i < len => PickerEntry::Account(i),
            Some(PickerEntry::CreateNew) => PickerEntry::CreateNew,
            _ if len > 0 => PickerEntry::Account(0),
            _ => PickerEntry::CreateNew,
        };
        Self { len, cursor }
    }

    pub fn cursor(&self) -> PickerEntry {
        self.cursor
    }

    pub fn down(&mut self) {
        self.cursor = match self.cursor {
            PickerEntry::Account(i) if i + 1 < self.len => PickerEntry::Account(i + 1),
            PickerEntry::Account(_) => PickerEntry::CreateNew,
            PickerEntry::CreateNew if self.len > 0 => PickerEntry::Account(0),
            PickerEntry::CreateNew => PickerEntry::CreateNew,
        };
    }

    pub fn up(&mut self) {
        self.cursor = match self.cursor {
            PickerEntry::Account(0) => PickerEntry::CreateNew,
            PickerEntry::Account(i) => PickerEntry::Account(i - 1),
            PickerEntry::CreateNew if self.len > 0 => PickerEntry::Account(self.len - 1),
            PickerEntry::CreateNew => PickerEntry::CreateNew,
        };
    }

    /// Apply a key; Enter yields the highlighted row
    pub fn handle(&mut self, key: Key) -> Option<PickerEntry> {
        match key {
            Key::Down => self.down(),
            Key::Up => self.up(),
            Key::Enter => return Some(self.cursor),
            _ => {}
        }
        None
    }
}

/// Show the picker until Enter is pressed
pub async fn pick_account<T: Terminal + ?Sized>(
    term: &mut T,
    store: &AccountStore,
    version: &str,
    start: Option<PickerEntry>,
) -> Result<PickerEntry> {
    let mut picker = Picker::new(store.accounts().len(), start);
    loop {
        render(term, store, version, picker.cursor())?;
        if let Some(entry) = picker.handle(term.read_key().await?) {
            return Ok(entry);
        }
    }
}

fn render<T: Terminal + ?Sized>(
    term: &mut T,
    store: &AccountStore,
    version: &str,
    cursor: PickerEntry,
) -> Result<()> {
    clear_screen(term, version)?;

    let title = "Select Account";
    let pad = (term.width() as usize).saturating_sub(title.len()) / 2;
    term.write(&format!("{}{}\n", " ".repeat(pad), title))?;

    let rows = store
        .accounts()
        .iter()
        .enumerate()
        .map(|(i, a)| (PickerEntry::Account(i), a.username.as_str()))
        .chain(std::iter::once((PickerEntry::CreateNew, "Create new account...")));

    for (entry, label) in rows {
        if entry == cursor {
            term.write_styled(label, Style::Highlight)?;
            term.write("\n")?;
        } else {
            term.write(&format!("{}\n", label))?;
        }
    }
    Ok(())
}
