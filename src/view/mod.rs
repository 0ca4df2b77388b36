//! Transcript view model
//!
//! Ordered display units plus the singleton typing placeholder. Every change is
//! mirrored as a [`ViewEvent`] on an optional channel so a UI binding (terminal,
//! web view) can follow along without the controller knowing about it.

use tokio::sync::mpsc;

use crate::{models::Recommendation, services::renderer::DisplayUnit};

pub mod terminal;

/// One slot of the transcript area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEntry {
    Unit(DisplayUnit),
    Typing,
}

/// Change notification for UI bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Appended(DisplayUnit),
    TypingShown,
    TypingHidden,
    Cleared,
    ScrolledToLatest,
}

#[derive(Debug, Default)]
pub struct TranscriptView {
    entries: Vec<ViewEntry>,
    scroll_count: usize,
    events: Option<mpsc::UnboundedSender<ViewEvent>>,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    /// View that forwards every change to `events`
    pub fn with_events(events: mpsc::UnboundedSender<ViewEvent>) -> Self {
        Self {
            events: Some(events),
            ..Self::default()
        }
    }

    fn emit(&self, event: ViewEvent) {
        if let Some(events) = &self.events {
            // A closed binding just stops receiving updates
            let _ = events.send(event);
        }
    }

    fn scroll_to_latest(&mut self) {
        self.scroll_count += 1;
        self.emit(ViewEvent::ScrolledToLatest);
    }

    fn push(&mut self, unit: DisplayUnit) {
        self.emit(ViewEvent::Appended(unit.clone()));
        self.entries.push(ViewEntry::Unit(unit));
    }

    /// Appends one unit and scrolls to it
    pub fn append(&mut self, unit: DisplayUnit) {
        self.push(unit);
        self.scroll_to_latest();
    }

    /// Appends a batch, scrolling once after the last unit
    pub fn replay(&mut self, units: Vec<DisplayUnit>) {
        if units.is_empty() {
            return;
        }
        for unit in units {
            self.push(unit);
        }
        self.scroll_to_latest();
    }

    /// Shows the typing placeholder; a no-op if it is already shown
    pub fn show_typing(&mut self) {
        if self.has_typing() {
            return;
        }
        self.entries.push(ViewEntry::Typing);
        self.emit(ViewEvent::TypingShown);
        self.scroll_to_latest();
    }

    /// Removes the typing placeholder; a no-op if there is none
    pub fn hide_typing(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != ViewEntry::Typing);
        if self.entries.len() != before {
            self.emit(ViewEvent::TypingHidden);
        }
    }

    /// Empties the transcript area, placeholder included
    pub fn clear(&mut self) {
        self.entries.clear();
        self.emit(ViewEvent::Cleared);
    }

    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    /// Display units in order, without the placeholder
    pub fn units(&self) -> impl Iterator<Item = &DisplayUnit> {
        self.entries.iter().filter_map(|entry| match entry {
            ViewEntry::Unit(unit) => Some(unit),
            ViewEntry::Typing => None,
        })
    }

    pub fn has_typing(&self) -> bool {
        self.entries.contains(&ViewEntry::Typing)
    }

    pub fn scroll_count(&self) -> usize {
        self.scroll_count
    }

    /// Most recent recommendation card still on screen
    pub fn latest_recommendation(&self) -> Option<&Recommendation> {
        self.units().filter_map(DisplayUnit::recommendation).last()
    }
}
