//! Event types for grid interaction notifications.
//!
//! The controller emits these toward the host; they are also what the test
//! suite asserts on. The host's change sink receives proposed mutations and
//! is solely responsible for applying them to the backing store.

use fabgrid_core::change::{ChangeRecord, RowRecord};
use fabgrid_core::range::SelectionRange;

/// Events emitted by the grid controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The selection changed (click, drag, keyboard, paste, clear).
    SelectionChanged(SelectionChangedEvent),

    /// The engine produced a batch of proposed mutations (paste, fill).
    DataChanged(DataChangedEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChangedEvent {
    /// Anchor/active range, if any selection exists.
    pub range: Option<SelectionRange>,
    /// Materialized selected cells in row-major order.
    pub cells: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataChangedEvent {
    pub changes: Vec<ChangeRecord>,
    /// Template-cloned rows to append before applying `changes`.
    pub appended_rows: Vec<RowRecord>,
}

/// Callback type for receiving grid events.
pub type EventCallback = Box<dyn FnMut(GridEvent)>;

/// Receives batches of proposed mutations; host-owned.
///
/// The engine never calls persistence directly. Appended rows must be applied
/// before change records, since a paste batch may target the new rows.
pub trait ChangeSink {
    fn apply_changes(&mut self, changes: &[ChangeRecord], appended_rows: &[RowRecord]);
}

/// Severity for host-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Host-facing notification channel (status bar, toast).
///
/// Clipboard failures are reported here and through the `log` facade, never
/// returned to the caller.
pub trait Notifier {
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Default notifier: routes notices to the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => log::info!("{message}"),
            NoticeLevel::Warning => log::warn!("{message}"),
            NoticeLevel::Error => log::error!("{message}"),
        }
    }
}

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only SelectionChanged events.
    pub fn selection_changed(&self) -> Vec<&SelectionChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::SelectionChanged(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Filter to only DataChanged events.
    pub fn data_changed(&self) -> Vec<&DataChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::DataChanged(d) => Some(d),
                _ => None,
            })
            .collect()
    }
}
