//! Common types used throughout the editor.

use std::time::Instant;

/// A cell coordinate in the grid. Row 0 is the header row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// In-progress edit of a single cell.
///
/// `target` is captured when editing starts, so a commit always lands on the cell that was
/// selected at that moment.
#[derive(Debug, Clone)]
pub struct CellEdit {
    pub target: CellPos,
    pub buffer: String,
    pub cursor: usize, // char index in buffer
}

impl CellEdit {
    /// Start editing `target`, pre-seeded with its current value and the cursor at the end.
    pub fn new(target: CellPos, initial: impl Into<String>) -> Self {
        let buffer = initial.into();
        let cursor = buffer.chars().count();
        Self { target, buffer, cursor }
    }
}

/// The two states of the edit-mode controller.
#[derive(Debug, Clone)]
pub enum Mode {
    Navigating,
    Editing(CellEdit),
}

/// A destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteRow(usize),
    DeleteColumn(usize),
    QuitAndSave,
}

impl PendingAction {
    /// Question shown in the dialog.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::DeleteRow(_) => "Do you want to delete selected row?",
            Self::DeleteColumn(_) => "Do you want to delete selected col?",
            Self::QuitAndSave => "Do you want to close the application?",
        }
    }
}

/// Dialog button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
}

impl Choice {
    pub fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

/// The single open confirmation dialog.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub action: PendingAction,
    pub focus: Choice,
}

impl Confirmation {
    /// Dialogs always open with "No" focused.
    pub fn new(action: PendingAction) -> Self {
        Self { action, focus: Choice::No }
    }
}

/// Short-lived status message shown in the status bar.
#[derive(Clone)]
pub struct StatusMsg {
    pub text: String,
    pub until: Instant,
}

/// Full-screen overlays drawn instead of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    Magnify,
}
