use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// One of the two comparison inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown slot `{0}`, expected `first` or `second`")]
pub struct ParseSlotError(String);

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "one" | "1" => Ok(Slot::First),
            "second" | "two" | "2" => Ok(Slot::Second),
            _ => Err(ParseSlotError(s.to_string())),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::First => f.write_str("first"),
            Slot::Second => f.write_str("second"),
        }
    }
}

/// Views the presentation layer can be asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Compare,
    History,
}

/// A user picked an entry in the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub path: PathBuf,
}

impl SelectionEvent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Instruction for the presentation layer after applying the selection.
///
/// `path` is `None` when nothing was selected and the slot should keep its value.
/// `requested_view` is set either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub slot: Slot,
    pub path: Option<PathBuf>,
    pub requested_view: View,
}

impl SlotUpdate {
    pub fn is_noop(&self) -> bool {
        self.path.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    selected: Option<PathBuf>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, event: SelectionEvent) {
        self.selected = Some(event.path);
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn apply_to(&self, slot: Slot) -> SlotUpdate {
        SlotUpdate {
            slot,
            path: self.selected.clone(),
            requested_view: View::Compare,
        }
    }
}
